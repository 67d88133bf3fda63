use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::MetricSummary;

// ---------------------------------------------------------------------------
// Summary export
// ---------------------------------------------------------------------------

/// Write the summaries as CSV (`metric,min,max,avg,p50,p90,p95,p99`).
pub fn write_summaries<W: io::Write>(writer: W, summaries: &[MetricSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for summary in summaries {
        wtr.serialize(summary)
            .with_context(|| format!("writing summary for '{}'", summary.metric))?;
    }
    wtr.flush().context("flushing summary CSV")?;
    Ok(())
}

/// Export the summaries to a file on disk.
pub fn export_summaries(path: &Path, summaries: &[MetricSummary]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_summaries(file, summaries)?;
    log::info!("Exported {} summaries to {}", summaries.len(), path.display());
    Ok(())
}
