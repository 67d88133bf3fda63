use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::MetricSummary;
use crate::state::AppState;

const HEADERS: [&str; 6] = ["Metric", "Min", "Average", "P95", "P99", "Max"];

/// The six cells of one table row, in `HEADERS` order.
pub fn row_cells(s: &MetricSummary) -> [String; 6] {
    [
        s.metric.clone(),
        s.min.to_string(),
        s.avg.to_string(),
        s.p95.to_string(),
        s.p99.to_string(),
        s.max.to_string(),
    ]
}

// ---------------------------------------------------------------------------
// Raw data summary table
// ---------------------------------------------------------------------------

pub fn summary_table(ui: &mut Ui, state: &AppState, summaries: &[MetricSummary]) {
    if summaries.is_empty() {
        ui.label("No numeric columns found.");
        return;
    }

    TableBuilder::new(ui)
        .vscroll(false)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(80.0), HEADERS.len() - 1)
        .header(22.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for s in summaries {
                body.row(20.0, |mut row| {
                    let cells = row_cells(s);
                    row.col(|ui| {
                        ui.label(
                            RichText::new(&cells[0]).color(state.series_colors.color_for(&s.metric)),
                        );
                    });
                    for (i, text) in cells.iter().enumerate().skip(1) {
                        row.col(|ui| {
                            // Highlight the average column.
                            if i == 2 {
                                ui.label(RichText::new(text).strong());
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            }
        });
}
