//! Chart builders: aggregation output → declarative chart descriptions.
//!
//! A [`ChartSpec`] says *what* to draw (kind, series, labels, colours,
//! title); `ui::plot` decides *how*. Specs are serializable so the current
//! charts can be exported as JSON.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{to_rgb, ColorMap};
use crate::data::aggregate::AggregationResult;
use crate::data::model::{LaunchDataset, LaunchRecord, Outcome, SiteSelection};

pub const PAYLOAD_AXIS_LABEL: &str = "Payload Mass (kg)";
pub const CLASS_AXIS_LABEL: &str = "class";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Points sharing one booster version category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub name: String,
    pub color: [u8; 3],
    /// `[payload_kg, class]` in dataset order.
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// Colour maps for every categorical encoding the charts use.
#[derive(Debug, Clone)]
pub struct ChartPalette {
    pub sites: ColorMap,
    pub boosters: ColorMap,
    pub outcomes: ColorMap,
}

impl ChartPalette {
    pub fn for_dataset(dataset: &LaunchDataset) -> Self {
        ChartPalette {
            sites: ColorMap::new(dataset.sites.iter().map(String::as_str)),
            boosters: ColorMap::new(dataset.booster_categories.iter().map(String::as_str)),
            outcomes: ColorMap::new([Outcome::Failure.label(), Outcome::Success.label()]),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Pie chart of launch outcomes; one slice per aggregation entry.
pub fn build_pie_chart(
    result: &AggregationResult,
    selection: &SiteSelection,
    palette: &ChartPalette,
) -> ChartSpec {
    let title = match selection {
        SiteSelection::All => "Total Successful Launches by Site".to_string(),
        SiteSelection::Site(site) => format!("Total Success vs Failure for site {site}"),
    };
    let colors = match result {
        AggregationResult::SuccessesBySite(_) => &palette.sites,
        AggregationResult::OutcomesForSite { .. } => &palette.outcomes,
    };

    let slices = result
        .entries()
        .into_iter()
        .map(|(label, value)| PieSlice {
            color: to_rgb(colors.color_for(&label)),
            label,
            value,
        })
        .collect();

    ChartSpec::Pie(PieChart { title, slices })
}

/// Scatter of payload against class, coloured by booster version category.
pub fn build_scatter_chart(
    records: &[&LaunchRecord],
    selection: &SiteSelection,
    palette: &ChartPalette,
) -> ChartSpec {
    let title = match selection {
        SiteSelection::All => "Correlation between Payload and Success for all sites".to_string(),
        SiteSelection::Site(site) => format!("Correlation between Payload and Success for {site}"),
    };

    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in records {
        groups
            .entry(rec.booster_version_category.as_str())
            .or_default()
            .push([rec.payload_mass_kg, f64::from(rec.outcome.class())]);
    }

    let series = groups
        .into_iter()
        .map(|(name, points)| ScatterSeries {
            name: name.to_string(),
            color: to_rgb(palette.boosters.color_for(name)),
            points,
        })
        .collect();

    ChartSpec::Scatter(ScatterChart {
        title,
        x_label: PAYLOAD_AXIS_LABEL.to_string(),
        y_label: CLASS_AXIS_LABEL.to_string(),
        series,
    })
}
