use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cell – a single value in a CSV row
// ---------------------------------------------------------------------------

/// A loosely-typed CSV cell: a number when the text parses as a finite
/// float, the trimmed text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify one trimmed field.
    ///
    /// Empty text stays text; anything that `f64::from_str` accepts and is
    /// finite becomes a number (so `inf` and `NaN` stay text).
    pub fn from_field(raw: &str) -> Self {
        if raw.is_empty() {
            return Cell::Text(String::new());
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One data row: column name → cell.
///
/// With duplicate header names the map keeps the value of the last column
/// carrying that name.
pub type Row = BTreeMap<String, Cell>;

// ---------------------------------------------------------------------------
// MetricSummary – per-column aggregate
// ---------------------------------------------------------------------------

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: String,
    pub min: f64,
    pub max: f64,
    /// Arithmetic mean rounded to 2 decimal places.
    pub avg: f64,
    /// Median.
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl MetricSummary {
    /// Fill level for the stat-card bar: `avg / max`, with a zero max
    /// treated as 1, clamped into `[0, 1]`.
    pub fn avg_to_max_ratio(&self) -> f32 {
        let denom = if self.max == 0.0 { 1.0 } else { self.max };
        ((self.avg / denom).clamp(0.0, 1.0)) as f32
    }
}

// ---------------------------------------------------------------------------
// Dataset – one parsed and summarized upload
// ---------------------------------------------------------------------------

/// The complete representation of one uploaded CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Source file name, opaque.
    pub filename: String,
    /// Rows in file order (header and blank lines excluded).
    pub data: Vec<Row>,
    /// Column names as they appear in the header, duplicates included.
    pub headers: Vec<String>,
    /// Header names whose first-row cell is a number, in header order.
    pub numeric_columns: Vec<String>,
    /// One summary per entry of `numeric_columns`, same order.
    pub summaries: Vec<MetricSummary>,
}

impl Dataset {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
