use std::path::Path;

use eframe::egui::{self, Color32, ProgressBar, RichText, ScrollArea, Ui};

use crate::color::severity_color;
use crate::data::export::export_summaries;
use crate::data::model::MetricSummary;
use crate::state::{AnalysisStatus, AppState};

/// Number of stat cards shown at the top of the side panel.
const CARD_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Left side panel – stat cards, series toggles, AI analysis
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Metrics");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let summaries = dataset.summaries.clone();
    let columns = dataset.numeric_columns.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for summary in summaries.iter().take(CARD_COUNT) {
                stat_card(ui, state, summary);
                ui.add_space(4.0);
            }
            ui.separator();

            // ---- Trend series toggles ----
            egui::CollapsingHeader::new(RichText::new("Trend series").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.show_all_metrics();
                        }
                        if ui.small_button("None").clicked() {
                            state.hide_all_metrics();
                        }
                    });
                    for col in &columns {
                        let mut checked = state.is_metric_visible(col);
                        let text = RichText::new(col).color(state.series_colors.color_for(col));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_metric(col);
                        }
                    }
                });
            ui.separator();

            analysis_section(ui, state);
        });
}

fn stat_card(ui: &mut Ui, state: &AppState, summary: &MetricSummary) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(
            RichText::new(summary.metric.to_uppercase())
                .small()
                .color(state.series_colors.color_for(&summary.metric)),
        );
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(format!("{:.2}", summary.avg)).heading().strong());
            ui.label(RichText::new("avg").small().weak());
        });
        ui.add(ProgressBar::new(summary.avg_to_max_ratio()).desired_height(4.0));
        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(format!("Max: {}", summary.max)).small());
            ui.label(RichText::new(format!("P99: {}", summary.p99)).small());
        });
    });
}

// ---------------------------------------------------------------------------
// AI analysis report
// ---------------------------------------------------------------------------

fn analysis_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("AI Analysis");

    match state.analysis.clone() {
        AnalysisStatus::Idle => {
            ui.label("Analyze metric patterns, detect anomalies and get recommendations.");
            if ui.button("Generate Analysis").clicked() {
                state.start_analysis();
            }
        }
        AnalysisStatus::Loading => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Consulting the model…");
            });
        }
        AnalysisStatus::Error(msg) => {
            ui.label(RichText::new(format!("Analysis failed: {msg}")).color(Color32::RED));
            if ui.button("Retry").clicked() {
                state.start_analysis();
            }
        }
        AnalysisStatus::Success(result) => {
            ui.label(
                RichText::new(format!("{} severity", result.severity.as_str().to_uppercase()))
                    .strong()
                    .color(severity_color(result.severity)),
            );
            ui.add_space(4.0);
            ui.label(RichText::new("Executive Summary").small().weak());
            ui.label(&result.summary);
            ui.add_space(4.0);
            ui.label(RichText::new("Recommendations").small().weak());
            for (idx, rec) in result.recommendations.iter().enumerate() {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong(format!("{}.", idx + 1));
                    ui.label(rec);
                });
            }
            if ui.small_button("Run again").clicked() {
                state.start_analysis();
            }
        }
    }
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
            let has_data = state.dataset.is_some();
            if ui
                .add_enabled(has_data, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Reset Data"))
                .clicked()
            {
                state.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} rows, {} numeric columns",
                ds.filename,
                ds.len(),
                ds.numeric_columns.len()
            ));
        }

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
        .set_title("Open metrics CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

/// Suggested export name: `metrics.CSV` → `metrics_summary.csv`.
fn summary_file_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "metrics".to_string());
    format!("{stem}_summary.csv")
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name(summary_file_name(&ds.filename))
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    if let Err(e) = export_summaries(&path, &ds.summaries) {
        log::error!("Failed to export summary: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

// ---------------------------------------------------------------------------
// Empty state
// ---------------------------------------------------------------------------

pub fn empty_state(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading("Analyze System Performance");
        ui.add_space(8.0);
        ui.label("Open a metrics CSV (File → Open…) or drop one onto the window.");
        ui.label(RichText::new("Expected format: timestamp, metric1, metric2...").small().weak());
    });
}
