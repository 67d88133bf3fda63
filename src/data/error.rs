use thiserror::Error;

/// Raised when the uploaded text cannot form a dataset at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error(
        "CSV file must contain a header row and at least one data row (found {lines} non-empty line(s))"
    )]
    TooFewLines { lines: usize },
}
