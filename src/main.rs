mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::LaunchDashApp;
use config::DashConfig;
use data::model::SiteSelection;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "launch-dash")]
#[command(version, about = "Interactive dashboard for SpaceX launch records")]
struct Args {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(default_value = "spacex_launch_dash.csv")]
    data: PathBuf,

    /// Configuration file (defaults to ./launch-dash.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial launch site selection
    #[arg(short, long, default_value = data::model::ALL_SITES)]
    site: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = DashConfig::load(args.config.as_deref())?;
    let dataset = data::loader::load_file(&args.data)
        .with_context(|| format!("loading launch records from {}", args.data.display()))?;

    if dataset.is_empty() {
        log::warn!("{} holds no launch records", args.data.display());
    }

    let mut state = AppState::new(dataset, config.clone());
    state.set_site(SiteSelection::from_value(&args.site));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title(config.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
