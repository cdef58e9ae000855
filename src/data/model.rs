use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{RangeError, RecordError};

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome. Ordered by class value, so `Failure < Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` cell (0 = failure, 1 = success).
    pub fn from_class(class: i64) -> Result<Self, RecordError> {
        match class {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(RecordError::InvalidClass(other)),
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
}

impl LaunchRecord {
    /// Build a record from raw cell values, enforcing the row invariants.
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        class: i64,
        booster_version_category: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let launch_site = launch_site.into().trim().to_string();
        if launch_site.is_empty() {
            return Err(RecordError::EmptySite);
        }
        if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
            return Err(RecordError::InvalidPayload(payload_mass_kg));
        }
        Ok(LaunchRecord {
            launch_site,
            payload_mass_kg,
            outcome: Outcome::from_class(class)?,
            booster_version_category: booster_version_category.into().trim().to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

// ---------------------------------------------------------------------------
// SiteSelection – dropdown value
// ---------------------------------------------------------------------------

/// Sentinel value the site dropdown uses for "every site".
pub const ALL_SITES: &str = "ALL";

/// Either every site or one named launch pad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a dropdown value; `"ALL"` is the sentinel.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// Whether a record from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }

    /// Human-readable label for the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(s) => s,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(ALL_SITES),
            SiteSelection::Site(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// PayloadRange – slider value, inclusive on both ends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        PayloadRange { low, high }
    }

    /// Inclusive containment. An inverted range contains nothing.
    pub fn contains(&self, payload_kg: f64) -> bool {
        self.low <= payload_kg && payload_kg <= self.high
    }

    /// Check the range is well formed and lies inside `domain`.
    pub fn validate(self, domain: PayloadRange) -> Result<Self, RangeError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(RangeError::NotFinite);
        }
        if self.low > self.high {
            return Err(RangeError::Inverted {
                low: self.low,
                high: self.high,
            });
        }
        if self.low < domain.low || self.high > domain.high {
            return Err(RangeError::OutOfDomain {
                low: self.low,
                high: self.high,
                min: domain.low,
                max: domain.high,
            });
        }
        Ok(self)
    }

    /// Smallest range covering both `self` and `other`.
    pub fn union(self, other: PayloadRange) -> Self {
        PayloadRange {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}-{:.0} kg", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column summaries.
#[derive(Debug, Clone, Default)]
pub struct LaunchDataset {
    /// All launches in file order.
    pub records: Vec<LaunchRecord>,
    /// Sorted distinct launch sites.
    pub sites: BTreeSet<String>,
    /// Sorted distinct booster version categories.
    pub booster_categories: BTreeSet<String>,
    /// Observed (min, max) payload; `None` for an empty table.
    pub payload_bounds: Option<PayloadRange>,
}

impl LaunchDataset {
    /// Build column summaries from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<PayloadRange> = None;

        for rec in &records {
            sites.insert(rec.launch_site.clone());
            booster_categories.insert(rec.booster_version_category.clone());
            let point = PayloadRange::new(rec.payload_mass_kg, rec.payload_mass_kg);
            payload_bounds = Some(match payload_bounds {
                Some(bounds) => bounds.union(point),
                None => point,
            });
        }

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    /// Slider start value: the observed payload bounds.
    pub fn default_payload_range(&self) -> PayloadRange {
        self.payload_bounds.unwrap_or(PayloadRange::new(0.0, 0.0))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
