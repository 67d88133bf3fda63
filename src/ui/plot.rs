use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::PERCENTILE_BARS;
use crate::data::model::{Dataset, MetricSummary};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// X axis selection for the trend chart
// ---------------------------------------------------------------------------

/// What the trend chart uses as its x coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    /// A numeric time/date column: its values are the x coordinates.
    NumericColumn(String),
    /// A text time/date column: rows are plotted by position, ticks show the
    /// row's text.
    LabelColumn(String),
    /// No time/date column: row position.
    Index,
}

impl XAxis {
    pub fn detect(dataset: &Dataset) -> Self {
        let found = dataset.headers.iter().find(|h| {
            let lower = h.to_lowercase();
            lower.contains("time") || lower.contains("date")
        });
        match found {
            Some(col) if dataset.numeric_columns.contains(col) => XAxis::NumericColumn(col.clone()),
            Some(col) => XAxis::LabelColumn(col.clone()),
            None => XAxis::Index,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            XAxis::NumericColumn(c) | XAxis::LabelColumn(c) => c,
            XAxis::Index => "index",
        }
    }
}

/// Shorten long timestamp labels to `HH:MM` (characters 11..16).
pub fn tick_label(raw: &str) -> String {
    if raw.chars().count() > 10 {
        raw.chars().skip(11).take(5).collect()
    } else {
        raw.to_string()
    }
}

/// `(x, y)` points of one metric. Rows whose x or y is not a number are
/// left out.
pub fn series_points(dataset: &Dataset, x_axis: &XAxis, metric: &str) -> Vec<[f64; 2]> {
    dataset
        .data
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let x = match x_axis {
                XAxis::NumericColumn(col) => row.get(col)?.as_f64()?,
                _ => i as f64,
            };
            let y = row.get(metric)?.as_f64()?;
            Some([x, y])
        })
        .collect()
}

/// Tick text at integer positions of `labels`, empty elsewhere.
fn label_at(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Trend chart
// ---------------------------------------------------------------------------

/// One line per visible numeric column over time (or row index).
pub fn trend_plot(ui: &mut Ui, state: &AppState, dataset: &Dataset, height: f32) {
    let x_axis = XAxis::detect(dataset);

    let mut plot = Plot::new("trend_plot")
        .legend(Legend::default())
        .height(height)
        .x_axis_label(x_axis.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    if let XAxis::LabelColumn(col) = &x_axis {
        let labels: Vec<String> = dataset
            .data
            .iter()
            .map(|row| row.get(col).map(|c| tick_label(&c.to_string())).unwrap_or_default())
            .collect();
        plot = plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            label_at(&labels, mark.value)
        });
    }

    plot.show(ui, |plot_ui| {
        for metric in &dataset.numeric_columns {
            if !state.is_metric_visible(metric) {
                continue;
            }
            let points: PlotPoints = series_points(dataset, &x_axis, metric).into_iter().collect();
            let line = Line::new(points)
                .name(metric)
                .color(state.series_colors.color_for(metric))
                .width(2.0);
            plot_ui.line(line);
        }
    });
}

// ---------------------------------------------------------------------------
// Percentile chart
// ---------------------------------------------------------------------------

const BAR_NAMES: [&str; 4] = ["Avg", "P95", "P99", "Max"];

fn bar_values(s: &MetricSummary) -> [f64; 4] {
    [s.avg, s.p95, s.p99, s.max]
}

/// Grouped Avg / P95 / P99 / Max bars per metric.
pub fn percentile_chart(ui: &mut Ui, dataset: &Dataset, height: f32) {
    let names: Vec<String> = dataset.summaries.iter().map(|s| s.metric.clone()).collect();
    let bar_width = 0.8 / BAR_NAMES.len() as f64;

    Plot::new("percentile_plot")
        .legend(Legend::default())
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            label_at(&names, mark.value)
        })
        .show(ui, |plot_ui| {
            for (k, (name, color)) in BAR_NAMES.iter().zip(PERCENTILE_BARS).enumerate() {
                let offset = (k as f64 - (BAR_NAMES.len() as f64 - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = dataset
                    .summaries
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        Bar::new(i as f64 + offset, bar_values(s)[k])
                            .width(bar_width * 0.9)
                            .name(format!("{} {name}", s.metric))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(*name).color(color));
            }
        });
}
