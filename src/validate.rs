//! Schema and completeness checks for the loaded score table.

use thiserror::Error;

use crate::table::{REQUIRED_COLUMNS, ScoreRow, ScoreTable};

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("input file must contain the columns: StudentID, Name, Subject, Score")]
    MissingColumns,
    #[error("input file contains missing values")]
    MissingData,
    #[error("score value '{0}' is not numeric")]
    InvalidScore(String),
}

/// Validates the table and returns its typed row view.
///
/// Checks run in order: required columns present, no cell empty anywhere
/// in the table, every `Score` cell a finite number. Any failure is fatal
/// to the run; nothing downstream sees unvalidated data.
pub fn validate(table: &ScoreTable) -> Result<Vec<ScoreRow>, ValidateError> {
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = table
            .column_index(name)
            .ok_or(ValidateError::MissingColumns)?;
    }
    let [id_col, name_col, subject_col, score_col] = indices;

    // Completeness covers every column, not just the required four.
    for row in &table.rows {
        if row.iter().any(|cell| cell.trim().is_empty()) {
            return Err(ValidateError::MissingData);
        }
    }

    let mut rows = Vec::with_capacity(table.row_count());
    for row in &table.rows {
        let score_text = row[score_col].trim();
        let score: f64 = score_text
            .parse()
            .ok()
            .filter(|s: &f64| s.is_finite())
            .ok_or_else(|| ValidateError::InvalidScore(score_text.to_string()))?;

        rows.push(ScoreRow {
            student_id: row[id_col].clone(),
            name: row[name_col].clone(),
            subject: row[subject_col].clone(),
            score,
        });
    }

    tracing::debug!(rows = rows.len(), "Score table validated");

    Ok(rows)
}
