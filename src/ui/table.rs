use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::LaunchRecord;

const ROW_HEIGHT: f32 = 18.0;

/// Table of the launches currently shown in the scatter chart.
pub fn record_table(ui: &mut Ui, records: &[&LaunchRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Launch Site", "Payload Mass (kg)", "Outcome", "Booster Version Category"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let rec = records[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.launch_site);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.0}", rec.payload_mass_kg));
                });
                row.col(|ui: &mut Ui| {
                    let color = if rec.is_success() {
                        Color32::from_rgb(40, 160, 90)
                    } else {
                        Color32::from_rgb(200, 60, 50)
                    };
                    ui.label(RichText::new(rec.outcome.label()).color(color));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.booster_version_category);
                });
            });
        });
}
