use std::time::Duration;

use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

/// Height of each chart in the central panel.
const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MetricPulseApp {
    pub state: AppState,
}

impl MetricPulseApp {
    /// Load the first file dropped onto the window, if any.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
        let Some(file) = dropped else {
            return;
        };

        if let Some(path) = &file.path {
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if is_csv {
                self.state.load_path(path);
            } else {
                self.state.reject_upload();
            }
        } else if let Some(bytes) = &file.bytes {
            if file.name.to_ascii_lowercase().ends_with(".csv") || file.mime == "text/csv" {
                self.state.load_bytes(&file.name, bytes);
            } else {
                self.state.reject_upload();
            }
        }
    }
}

impl eframe::App for MetricPulseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        self.state.poll_analysis();
        if self.state.is_analyzing() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: stat cards + AI analysis ----
        if self.state.dataset.is_some() {
            egui::SidePanel::left("metrics_panel")
                .default_width(260.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: charts and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        panels::empty_state(ui);
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Time Series Metrics");
            plot::trend_plot(ui, state, dataset, CHART_HEIGHT);
            ui.add_space(12.0);

            ui.heading("Distribution (P95, P99, Max)");
            plot::percentile_chart(ui, dataset, CHART_HEIGHT);
            ui.add_space(12.0);

            ui.heading("Raw Data Summary");
            table::summary_table(ui, state, &dataset.summaries);
        });
}
