use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{LaunchDataset, LaunchRecord, Outcome, SiteSelection};

// ---------------------------------------------------------------------------
// Success counts for the pie chart
// ---------------------------------------------------------------------------

/// Counts grouped by site (all-sites view) or by outcome (single-site view).
///
/// Only non-empty groups appear: a site with no successes is absent from
/// `SuccessesBySite`, and an outcome with no launches is absent from
/// `OutcomesForSite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AggregationResult {
    SuccessesBySite(BTreeMap<String, usize>),
    OutcomesForSite {
        site: String,
        counts: BTreeMap<Outcome, usize>,
    },
}

impl AggregationResult {
    /// `(label, count)` pairs in key order.
    pub fn entries(&self) -> Vec<(String, usize)> {
        match self {
            AggregationResult::SuccessesBySite(counts) => counts
                .iter()
                .map(|(site, n)| (site.clone(), *n))
                .collect(),
            AggregationResult::OutcomesForSite { counts, .. } => counts
                .iter()
                .map(|(outcome, n)| (outcome.label().to_string(), *n))
                .collect(),
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        match self {
            AggregationResult::SuccessesBySite(counts) => counts.values().sum(),
            AggregationResult::OutcomesForSite { counts, .. } => counts.values().sum(),
        }
    }
}

/// Count launches for the pie chart.
///
/// * `All` → successful launches per site.
/// * a site → successes and failures at that site. An unknown site simply
///   matches no rows and yields an empty grouping.
pub fn compute_success_counts(
    dataset: &LaunchDataset,
    selection: &SiteSelection,
) -> AggregationResult {
    match selection {
        SiteSelection::All => {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for rec in dataset.records.iter().filter(|r| r.is_success()) {
                *counts.entry(rec.launch_site.clone()).or_default() += 1;
            }
            AggregationResult::SuccessesBySite(counts)
        }
        SiteSelection::Site(site) => {
            let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
            for rec in dataset.records.iter().filter(|r| r.launch_site == *site) {
                *counts.entry(rec.outcome).or_default() += 1;
            }
            AggregationResult::OutcomesForSite {
                site: site.clone(),
                counts,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Success-rate summary
// ---------------------------------------------------------------------------

/// How launches are grouped for the success-rate summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateKey {
    Site,
    Booster,
    /// Fixed-width payload buckets, `[k * width, (k + 1) * width)`.
    PayloadBucket { width: f64 },
}

impl RateKey {
    pub fn label(&self) -> &'static str {
        match self {
            RateKey::Site => "Launch site",
            RateKey::Booster => "Booster version",
            RateKey::PayloadBucket { .. } => "Payload range",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRate {
    pub label: String,
    pub launches: usize,
    pub successes: usize,
}

impl SuccessRate {
    /// Fraction of successful launches in `[0, 1]`.
    pub fn rate(&self) -> f64 {
        if self.launches == 0 {
            0.0
        } else {
            self.successes as f64 / self.launches as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Name(String),
    Bucket(u64),
}

/// Group `records` by `key` and report launches / successes per group,
/// in ascending key order.
pub fn success_rates<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    key: RateKey,
) -> Vec<SuccessRate> {
    let mut groups: BTreeMap<GroupKey, (usize, usize)> = BTreeMap::new();
    for rec in records {
        let group = match key {
            RateKey::Site => GroupKey::Name(rec.launch_site.clone()),
            RateKey::Booster => GroupKey::Name(rec.booster_version_category.clone()),
            RateKey::PayloadBucket { width } => {
                GroupKey::Bucket((rec.payload_mass_kg / bucket_width(width)).floor() as u64)
            }
        };
        let entry = groups.entry(group).or_default();
        entry.0 += 1;
        if rec.is_success() {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(group, (launches, successes))| SuccessRate {
            label: match group {
                GroupKey::Name(name) => name,
                GroupKey::Bucket(k) => {
                    let width = match key {
                        RateKey::PayloadBucket { width } => bucket_width(width),
                        _ => 1.0,
                    };
                    format!("{:.0}-{:.0} kg", k as f64 * width, (k + 1) as f64 * width)
                }
            },
            launches,
            successes,
        })
        .collect()
}

fn bucket_width(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        1000.0
    }
}
