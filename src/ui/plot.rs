use std::f64::consts::TAU;

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{ChartSpec, PieChart, ScatterChart};
use crate::color::from_rgb;
use crate::state::ChartState;

/// Largest arc one polygon may span; egui fills polygons as convex shapes.
const MAX_WEDGE_ARC: f64 = TAU / 4.0;

/// Angular resolution of pie arcs.
const ARC_STEP: f64 = TAU / 180.0;

// ---------------------------------------------------------------------------
// Chart placeholder
// ---------------------------------------------------------------------------

/// Render one chart placeholder according to its state.
pub fn chart_placeholder(ui: &mut Ui, id: &str, state: &ChartState, height: f32) {
    match state {
        ChartState::Stale => {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.spinner();
                });
            });
        }
        ChartState::Error(msg) => {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("Chart unavailable: {msg}"))
                            .color(Color32::RED),
                    );
                });
            });
        }
        ChartState::Rendered(ChartSpec::Pie(pie)) => pie_chart(ui, id, pie, height),
        ChartState::Rendered(ChartSpec::Scatter(scatter)) => {
            scatter_chart(ui, id, scatter, height)
        }
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, id: &str, pie: &PieChart, height: f32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&pie.title);
    });

    let total = pie.total();
    if total == 0 {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No launches match the current selection.");
            });
        });
        return;
    }

    let values: Vec<usize> = pie.slices.iter().map(|s| s.value).collect();
    let wedges = pie_wedges(&values);

    Plot::new(id)
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (slice, parts) in pie.slices.iter().zip(wedges) {
                let color = from_rgb(slice.color);
                let share = slice.value as f64 / total as f64;
                let name = format!("{} ({})", slice.label, slice.value);

                for part in parts.polygons {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(part))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&name),
                    );
                }

                let (sin, cos) = parts.mid_angle.sin_cos();
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * cos, 0.65 * sin),
                        RichText::new(format!("{:.1}%", share * 100.0)).strong(),
                    )
                    .color(Color32::WHITE),
                );
            }
        });
}

/// Geometry of one pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Convex polygons that together cover the slice.
    pub polygons: Vec<Vec<[f64; 2]>>,
    /// Angle of the slice bisector, for the label.
    pub mid_angle: f64,
}

/// Split a unit circle into slices proportional to `values`, starting at
/// twelve o'clock and running clockwise.
pub fn pie_wedges(values: &[usize]) -> Vec<Wedge> {
    let total: usize = values.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = TAU / 4.0;
    values
        .iter()
        .map(|&v| {
            let sweep = TAU * v as f64 / total as f64;
            let end = start - sweep;

            let mut polygons = Vec::new();
            let mut a0 = start;
            while a0 - end > 1e-9 {
                let a1 = (a0 - MAX_WEDGE_ARC).max(end);
                let mut points = vec![[0.0, 0.0]];
                let steps = ((a0 - a1) / ARC_STEP).ceil().max(1.0) as usize;
                for k in 0..=steps {
                    let a = a0 - (a0 - a1) * k as f64 / steps as f64;
                    points.push([a.cos(), a.sin()]);
                }
                polygons.push(points);
                a0 = a1;
            }

            let wedge = Wedge {
                polygons,
                mid_angle: start - sweep / 2.0,
            };
            start = end;
            wedge
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, id: &str, scatter: &ScatterChart, height: f32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&scatter.title);
    });

    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(scatter.x_label.as_str())
        .y_axis_label(scatter.y_label.as_str())
        .include_y(-0.25)
        .include_y(1.25)
        .include_x(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{:.0} kg", value.x)
            } else {
                format!("{name}\n{:.0} kg, class {:.0}", value.x, value.y)
            }
        })
        .show(ui, |plot_ui| {
            for series in &scatter.series {
                plot_ui.points(
                    Points::new(PlotPoints::from(series.points.clone()))
                        .name(&series.name)
                        .color(from_rgb(series.color))
                        .radius(4.0)
                        .filled(true),
                );
            }
        });

    if scatter.series.is_empty() {
        ui.label("No launches in this payload range.");
    }
}
