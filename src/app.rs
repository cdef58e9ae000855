use eframe::egui::{self, ScrollArea, Ui};

use crate::state::{AppState, Output};
use crate::ui::{panels, plot, table};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    plot::chart_placeholder(
                        ui,
                        "success_pie_chart",
                        self.state.chart(Output::SuccessPie),
                        CHART_HEIGHT,
                    );
                    ui.separator();
                    plot::chart_placeholder(
                        ui,
                        "success_payload_scatter_chart",
                        self.state.chart(Output::PayloadScatter),
                        CHART_HEIGHT,
                    );
                    ui.separator();

                    let records = self.state.visible_records();
                    egui::CollapsingHeader::new(format!("Launches in view ({})", records.len()))
                        .id_salt("record_table")
                        .default_open(false)
                        .show(ui, |ui: &mut Ui| {
                            table::record_table(ui, &records);
                        });
                });
        });
    }
}
