use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::RateKey;
use crate::data::model::PayloadRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            site_dropdown(ui, state);
            ui.separator();
            payload_slider(ui, state);
            ui.separator();
            insights(ui, state);
        });
}

fn site_dropdown(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Launch Site");

    let mut chosen = None;
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(state.site.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.site_options {
                if ui
                    .selectable_label(*option == state.site, option.label())
                    .clicked()
                {
                    chosen = Some(option.clone());
                }
            }
        });

    if let Some(site) = chosen {
        state.set_site(site);
    }
}

fn payload_slider(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Payload range (Kg):");

    let domain = state.payload_domain;
    let step = state.config.payload.step;
    let mut low = state.payload.low;
    let mut high = state.payload.high;

    let mut changed = false;
    changed |= ui
        .add(
            egui::Slider::new(&mut low, domain.low..=domain.high)
                .step_by(step)
                .text("min"),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut high, domain.low..=domain.high)
                .step_by(step)
                .text("max"),
        )
        .changed();

    if changed {
        state.set_payload_range(PayloadRange::new(low, high));
    }

    if ui.small_button("Reset to data range").clicked() {
        state.reset_payload_range();
    }
}

fn insights(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Insights").strong())
        .id_salt("insights")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let bucket = RateKey::PayloadBucket {
                width: state.config.payload.step * 2.5,
            };
            ui.horizontal(|ui: &mut Ui| {
                for key in [RateKey::Site, RateKey::Booster, bucket] {
                    if ui
                        .selectable_label(state.insight_key == key, key.label())
                        .clicked()
                    {
                        state.insight_key = key;
                    }
                }
            });

            let rates = state.insights();
            if rates.is_empty() {
                ui.label("No launches in view.");
                return;
            }

            egui::Grid::new("insights_grid")
                .striped(true)
                .num_columns(3)
                .show(ui, |ui: &mut Ui| {
                    ui.strong(state.insight_key.label());
                    ui.strong("Launches");
                    ui.strong("Success");
                    ui.end_row();

                    for rate in &rates {
                        ui.label(&rate.label);
                        ui.label(rate.launches.to_string());
                        ui.label(format!("{:.1}%", rate.rate() * 100.0));
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches loaded, {} in view",
            state.dataset.len(),
            state.visible_records().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .set_file_name("charts.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_charts(&path) {
            log::error!("Failed to export charts: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
