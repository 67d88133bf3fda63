use std::path::Path;

use anyhow::{Context, Result, bail};

use super::error::FormatError;
use super::model::{Cell, Dataset, Row};
use super::stats::summarize;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metrics dataset from a file.  Dispatch by extension.
///
/// Only `.csv` is supported: comma-separated, first line is the header.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading CSV file {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dataset = parse_csv(&text, &filename).context("parsing CSV")?;
    log::info!(
        "Loaded {} rows from {filename}, numeric columns {:?}",
        dataset.len(),
        dataset.numeric_columns
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// Parse CSV text into a summarized [`Dataset`].
///
/// Deliberately naive: fields are split on every `,` (no quoting), each field
/// is trimmed and classified with [`Cell::from_field`]. Blank lines are
/// skipped; a row shorter than the header gets `Text("")` for the missing
/// trailing cells, extra trailing values are ignored.
///
/// A column is numeric when the first data row's cell for it is a number.
/// Later rows are not checked.
pub fn parse_csv(content: &str, filename: &str) -> Result<Dataset, FormatError> {
    // `str::trim` keeps a leading byte-order mark, which spreadsheet exports add.
    let lines: Vec<&str> = split_lines(content.trim_start_matches('\u{feff}').trim()).collect();
    if lines.len() < 2 {
        let non_empty = lines.iter().filter(|l| !l.trim().is_empty()).count();
        return Err(FormatError::TooFewLines { lines: non_empty });
    }

    let headers: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();

    let data: Vec<Row> = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_row(&headers, line))
        .collect();

    let numeric_columns: Vec<String> = match data.first() {
        Some(first) => headers
            .iter()
            .filter(|h| first.get(h.as_str()).is_some_and(Cell::is_number))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    // Every numeric column has a number in row 0, so `summarize` always
    // returns Some here and `summaries` stays aligned with `numeric_columns`.
    let summaries = numeric_columns
        .iter()
        .filter_map(|col| summarize(&data, col))
        .collect();

    Ok(Dataset {
        filename: filename.to_string(),
        data,
        headers,
        numeric_columns,
        summaries,
    })
}

fn parse_row(headers: &[String], line: &str) -> Row {
    let values: Vec<&str> = line.split(',').collect();
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let raw = values.get(i).map(|v| v.trim()).unwrap_or("");
            (header.clone(), Cell::from_field(raw))
        })
        .collect()
}

/// Split on `\n`, dropping the `\r` of a `\r\n` pair.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}
