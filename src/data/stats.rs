use super::model::{MetricSummary, Row};

/// Fractions reported for every metric, in `MetricSummary` field order.
pub const PERCENTILES: [f64; 4] = [0.50, 0.90, 0.95, 0.99];

// ---------------------------------------------------------------------------
// Per-column summary
// ---------------------------------------------------------------------------

/// Compute the summary for one numeric column.
///
/// Text cells (stray values in a column classified as numeric, including
/// empty strings from blank or short rows) are dropped before any statistic
/// is taken. Returns `None` when no numeric value remains.
pub fn summarize(rows: &[Row], column: &str) -> Option<MetricSummary> {
    let mut values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.get(column).and_then(|c| c.as_f64()))
        .collect();

    if values.len() < rows.len() {
        log::debug!(
            "column '{column}': dropped {} non-numeric cell(s)",
            rows.len() - values.len()
        );
    }
    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let count = values.len();
    let sum: f64 = values.iter().sum();

    Some(MetricSummary {
        metric: column.to_string(),
        min: values[0],
        max: values[count - 1],
        avg: round2(sum / count as f64),
        p50: nearest_rank(&values, PERCENTILES[0]),
        p90: nearest_rank(&values, PERCENTILES[1]),
        p95: nearest_rank(&values, PERCENTILES[2]),
        p99: nearest_rank(&values, PERCENTILES[3]),
    })
}

/// Nearest-rank percentile of an ascending slice: the value at
/// `ceil(fraction * n) - 1`, clamped into `[0, n - 1]`. No interpolation.
///
/// Returns NaN for an empty slice.
pub fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let n = sorted.len();
    let rank = (fraction * n as f64).ceil() as i64 - 1;
    let idx = rank.clamp(0, n as i64 - 1) as usize;
    sorted[idx]
}

/// Round to 2 decimal places, halves away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
