//! CSV loading for the score table.

use std::path::Path;

use thiserror::Error;

use crate::table::ScoreTable;

/// Default input file name, read from the working directory.
pub const DEFAULT_INPUT: &str = "student_scores.csv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{0}' not found")]
    FileNotFound(String),
    #[error("failed to read the input file: {0}")]
    Malformed(#[from] csv::Error),
}

/// Reads a CSV file into a [`ScoreTable`].
///
/// The first record becomes the column header; every following record is
/// one row. Records whose field count differs from the header are rejected.
///
/// # Errors
///
/// Returns [`LoadError::FileNotFound`] if `path` does not exist, and
/// [`LoadError::Malformed`] if the file cannot be parsed as CSV.
pub fn load_table(path: &Path) -> Result<ScoreTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    tracing::debug!(
        path = %path.display(),
        rows = rows.len(),
        columns = columns.len(),
        "Score table loaded"
    );

    Ok(ScoreTable { columns, rows })
}
