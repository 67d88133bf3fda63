/// Data layer: core types, parsing, statistics, and export.
///
/// Architecture:
/// ```text
///      .csv text
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  split lines → typed rows, pick numeric columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  min / max / avg / nearest-rank percentiles per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  rows, headers, numeric columns, summaries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  summaries → CSV
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod stats;
