use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chart::{build_pie_chart, build_scatter_chart, ChartPalette, ChartSpec};
use crate::config::DashConfig;
use crate::data::aggregate::{compute_success_counts, success_rates, RateKey, SuccessRate};
use crate::data::filter::compute_filtered_scatter;
use crate::data::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelection};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Controls, outputs and their bindings
// ---------------------------------------------------------------------------

/// An input widget that publishes value-changed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SiteDropdown,
    PayloadSlider,
}

/// A chart placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Output {
    SuccessPie,
    PayloadScatter,
}

impl Output {
    pub const ALL: [Output; 2] = [Output::SuccessPie, Output::PayloadScatter];

    /// The controls this output subscribes to.
    pub fn inputs(self) -> &'static [Control] {
        match self {
            Output::SuccessPie => &[Control::SiteDropdown],
            Output::PayloadScatter => &[Control::SiteDropdown, Control::PayloadSlider],
        }
    }

    pub fn depends_on(self, control: Control) -> bool {
        self.inputs().contains(&control)
    }
}

/// Render state of one chart placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartState {
    /// An input changed and the chart has not been recomputed yet.
    Stale,
    Rendered(ChartSpec),
    /// The pipeline failed; the placeholder shows this message instead.
    Error(String),
}

impl ChartState {
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            ChartState::Rendered(spec) => Some(spec),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashConfig,

    /// Loaded launch table, read-only between File → Open calls.
    pub dataset: LaunchDataset,

    /// Colour maps derived from the dataset.
    pub palette: ChartPalette,

    /// Dropdown entries, `All` first.
    pub site_options: Vec<SiteSelection>,

    /// Current dropdown value.
    pub site: SiteSelection,

    /// Current slider value.
    pub payload: PayloadRange,

    /// Slider domain: the configured domain widened to the observed payloads.
    pub payload_domain: PayloadRange,

    /// Validated range behind the rendered scatter chart; `None` while the
    /// scatter chart is in its error state.
    scatter_range: Option<PayloadRange>,

    /// Grouping used by the insights panel.
    pub insight_key: RateKey,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    charts: BTreeMap<Output, ChartState>,
}

impl AppState {
    /// Build the state for a freshly loaded dataset and render both charts.
    pub fn new(dataset: LaunchDataset, config: DashConfig) -> Self {
        let mut state = AppState {
            insight_key: RateKey::Site,
            config,
            palette: ChartPalette::for_dataset(&dataset),
            dataset,
            site_options: Vec::new(),
            site: SiteSelection::All,
            payload: PayloadRange::new(0.0, 0.0),
            payload_domain: PayloadRange::new(0.0, 0.0),
            scatter_range: None,
            status_message: None,
            charts: Output::ALL.iter().map(|&o| (o, ChartState::Stale)).collect(),
        };
        state.reset_controls();
        state
    }

    /// Ingest a newly loaded dataset, reset controls and re-render.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.palette = ChartPalette::for_dataset(&dataset);
        self.dataset = dataset;
        self.status_message = None;
        self.reset_controls();
    }

    /// Put every control back to its default and publish both.
    fn reset_controls(&mut self) {
        self.site_options = site_options(&self.config, &self.dataset);
        self.site = SiteSelection::All;

        let configured = PayloadRange::new(self.config.payload.min, self.config.payload.max);
        let observed = self.dataset.default_payload_range();
        self.payload_domain = match self.dataset.payload_bounds {
            Some(bounds) => configured.union(bounds),
            None => configured,
        };
        self.payload = observed;

        self.publish(Control::SiteDropdown);
        self.publish(Control::PayloadSlider);
    }

    /// Change the site dropdown value. No-op when unchanged.
    pub fn set_site(&mut self, site: SiteSelection) {
        if self.site != site {
            self.site = site;
            self.publish(Control::SiteDropdown);
        }
    }

    /// Change the payload slider value. No-op when unchanged.
    pub fn set_payload_range(&mut self, range: PayloadRange) {
        if self.payload != range {
            self.payload = range;
            self.publish(Control::PayloadSlider);
        }
    }

    /// Slider back to the observed payload bounds.
    pub fn reset_payload_range(&mut self) {
        self.set_payload_range(self.dataset.default_payload_range());
    }

    /// Deliver a value-changed event: every subscribed output goes stale and
    /// is recomputed synchronously. Returns the outputs that were recomputed.
    pub fn publish(&mut self, control: Control) -> Vec<Output> {
        let subscribers: Vec<Output> = Output::ALL
            .into_iter()
            .filter(|o| o.depends_on(control))
            .collect();

        for &output in &subscribers {
            self.charts.insert(output, ChartState::Stale);
        }
        for &output in &subscribers {
            let next = match self.recompute(output) {
                Ok(spec) => ChartState::Rendered(spec),
                Err(e) => {
                    log::warn!("{output:?} failed: {e}");
                    ChartState::Error(e.to_string())
                }
            };
            self.charts.insert(output, next);
        }

        log::debug!(
            "{control:?} changed (site={}, payload={}): recomputed {subscribers:?}",
            self.site,
            self.payload
        );
        subscribers
    }

    /// Run the aggregation + chart pipeline for one output.
    fn recompute(&mut self, output: Output) -> Result<ChartSpec, PipelineError> {
        match output {
            Output::SuccessPie => {
                let result = compute_success_counts(&self.dataset, &self.site);
                log::debug!("pie: {} groups, {} launches", result.entries().len(), result.total());
                Ok(build_pie_chart(&result, &self.site, &self.palette))
            }
            Output::PayloadScatter => {
                self.scatter_range = None;
                let range = self.payload.validate(self.payload_domain)?;
                self.scatter_range = Some(range);
                let records = self.visible_records();
                log::debug!("scatter: {} of {} launches", records.len(), self.dataset.len());
                Ok(build_scatter_chart(&records, &self.site, &self.palette))
            }
        }
    }

    pub fn chart(&self, output: Output) -> &ChartState {
        static STALE: ChartState = ChartState::Stale;
        self.charts.get(&output).unwrap_or(&STALE)
    }

    /// Launches currently shown in the scatter chart, in dataset order.
    pub fn visible_records(&self) -> Vec<&LaunchRecord> {
        match self.scatter_range {
            Some(range) => compute_filtered_scatter(&self.dataset, &self.site, range),
            None => Vec::new(),
        }
    }

    /// Success rates of the visible launches, grouped by `insight_key`.
    pub fn insights(&self) -> Vec<SuccessRate> {
        success_rates(self.visible_records(), self.insight_key)
    }

    /// Write both rendered charts as pretty JSON.
    pub fn export_charts(&self, path: &Path) -> Result<()> {
        #[derive(Serialize)]
        struct Export<'a> {
            site: String,
            payload: PayloadRange,
            success_pie: Option<&'a ChartSpec>,
            payload_scatter: Option<&'a ChartSpec>,
        }

        let export = Export {
            site: self.site.to_string(),
            payload: self.payload,
            success_pie: self.chart(Output::SuccessPie).spec(),
            payload_scatter: self.chart(Output::PayloadScatter).spec(),
        };
        let json = serde_json::to_string_pretty(&export).context("serializing charts")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported charts to {}", path.display());
        Ok(())
    }
}

/// `All`, then the configured sites, then any other sites found in the data.
fn site_options(config: &DashConfig, dataset: &LaunchDataset) -> Vec<SiteSelection> {
    let mut options = vec![SiteSelection::All];
    let configured = config.sites.iter();
    let extra = dataset.sites.iter().filter(|s| !config.sites.contains(s));
    for site in configured.chain(extra) {
        let option = SiteSelection::Site(site.clone());
        if !options.contains(&option) {
            options.push(option);
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{PieChart, ScatterChart};

    fn scenario() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 3000.0, 1, "FT").unwrap(),
            LaunchRecord::new("KSC LC-39A", 5000.0, 0, "FT").unwrap(),
            LaunchRecord::new("CCAFS LC-40", 2000.0, 1, "B5").unwrap(),
        ])
    }

    fn state() -> AppState {
        AppState::new(scenario(), DashConfig::default())
    }

    fn pie(state: &AppState) -> &PieChart {
        match state.chart(Output::SuccessPie) {
            ChartState::Rendered(ChartSpec::Pie(p)) => p,
            other => panic!("pie not rendered: {other:?}"),
        }
    }

    fn scatter(state: &AppState) -> &ScatterChart {
        match state.chart(Output::PayloadScatter) {
            ChartState::Rendered(ChartSpec::Scatter(s)) => s,
            other => panic!("scatter not rendered: {other:?}"),
        }
    }

    #[test]
    fn test_initial_render() {
        let state = state();
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload, PayloadRange::new(2000.0, 5000.0));
        assert_eq!(state.payload_domain, PayloadRange::new(0.0, 10_000.0));
        assert_eq!(pie(&state).title, "Total Successful Launches by Site");
        assert_eq!(scatter(&state).point_count(), 3);
        assert_eq!(state.visible_records().len(), 3);
    }

    #[test]
    fn test_bindings() {
        assert!(Output::SuccessPie.depends_on(Control::SiteDropdown));
        assert!(!Output::SuccessPie.depends_on(Control::PayloadSlider));
        assert!(Output::PayloadScatter.depends_on(Control::SiteDropdown));
        assert!(Output::PayloadScatter.depends_on(Control::PayloadSlider));
    }

    #[test]
    fn test_publish_only_recomputes_subscribers() {
        let mut state = state();
        assert_eq!(
            state.publish(Control::PayloadSlider),
            vec![Output::PayloadScatter]
        );
        assert_eq!(
            state.publish(Control::SiteDropdown),
            vec![Output::SuccessPie, Output::PayloadScatter]
        );
    }

    #[test]
    fn test_site_change_updates_both_charts() {
        let mut state = state();
        state.set_site(SiteSelection::Site("KSC LC-39A".into()));

        let pie = pie(&state);
        assert_eq!(pie.title, "Total Success vs Failure for site KSC LC-39A");
        assert_eq!(pie.total(), 2);

        let scatter = scatter(&state);
        assert_eq!(scatter.title, "Correlation between Payload and Success for KSC LC-39A");
        assert_eq!(scatter.point_count(), 2);
    }

    #[test]
    fn test_payload_change_leaves_pie_untouched() {
        let mut state = state();
        let before = state.chart(Output::SuccessPie).clone();
        state.set_payload_range(PayloadRange::new(0.0, 4000.0));

        assert_eq!(state.chart(Output::SuccessPie), &before);
        let visible = state.visible_records();
        assert_eq!(visible, vec![&state.dataset.records[0], &state.dataset.records[2]]);
        assert_eq!(scatter(&state).point_count(), 2);
    }

    #[test]
    fn test_inverted_range_enters_error_state() {
        let mut state = state();
        state.set_payload_range(PayloadRange::new(6000.0, 1000.0));

        match state.chart(Output::PayloadScatter) {
            ChartState::Error(msg) => assert!(msg.contains("inverted"), "{msg}"),
            other => panic!("expected error state, got {other:?}"),
        }
        assert!(state.visible_records().is_empty());
        // The pie chart does not depend on the slider.
        assert!(matches!(state.chart(Output::SuccessPie), ChartState::Rendered(_)));

        state.set_payload_range(PayloadRange::new(1000.0, 6000.0));
        assert_eq!(scatter(&state).point_count(), 3);
    }

    #[test]
    fn test_out_of_domain_range_enters_error_state() {
        let mut state = state();
        state.set_payload_range(PayloadRange::new(0.0, 20_000.0));
        assert!(matches!(state.chart(Output::PayloadScatter), ChartState::Error(_)));
    }

    #[test]
    fn test_unknown_site_renders_empty_charts() {
        let mut state = state();
        state.set_site(SiteSelection::Site("Boca Chica".into()));
        assert!(pie(&state).slices.is_empty());
        assert!(scatter(&state).series.is_empty());
    }

    #[test]
    fn test_site_options_merge_config_and_data() {
        let mut records = scenario().records;
        records.push(LaunchRecord::new("Boca Chica", 100.0, 1, "Starship").unwrap());
        let state = AppState::new(LaunchDataset::from_records(records), DashConfig::default());

        let labels: Vec<String> = state.site_options.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec!["ALL", "CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40", "Boca Chica"]
        );
    }

    #[test]
    fn test_domain_widens_to_observed_payloads() {
        let ds = LaunchDataset::from_records(vec![
            LaunchRecord::new("KSC LC-39A", 15_600.0, 1, "B5").unwrap(),
        ]);
        let state = AppState::new(ds, DashConfig::default());
        assert_eq!(state.payload_domain, PayloadRange::new(0.0, 15_600.0));
        assert!(matches!(state.chart(Output::PayloadScatter), ChartState::Rendered(_)));
    }

    #[test]
    fn test_set_dataset_resets_controls() {
        let mut state = state();
        state.set_site(SiteSelection::Site("KSC LC-39A".into()));
        state.set_payload_range(PayloadRange::new(0.0, 1000.0));

        state.set_dataset(LaunchDataset::from_records(vec![
            LaunchRecord::new("VAFB SLC-4E", 9600.0, 1, "B5").unwrap(),
        ]));
        assert_eq!(state.site, SiteSelection::All);
        assert_eq!(state.payload, PayloadRange::new(9600.0, 9600.0));
        assert_eq!(pie(&state).slices[0].label, "VAFB SLC-4E");
        assert_eq!(state.visible_records().len(), 1);
    }

    #[test]
    fn test_insights_follow_visible_records() {
        let mut state = state();
        state.insight_key = RateKey::Booster;
        let rates = state.insights();
        assert_eq!(rates.len(), 2);

        state.set_payload_range(PayloadRange::new(4000.0, 6000.0));
        let rates = state.insights();
        assert_eq!(rates.len(), 1);
        assert_eq!((rates[0].launches, rates[0].successes), (1, 0));
    }

    #[test]
    fn test_export_charts() {
        let state = state();
        let file = tempfile::NamedTempFile::new().unwrap();
        state.export_charts(file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["site"], "ALL");
        assert_eq!(json["success_pie"]["kind"], "pie");
        assert_eq!(json["payload_scatter"]["kind"], "scatter");
    }
}
