use thiserror::Error;

use crate::table::DataType;

/// Violations of the in-memory table invariants.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("duplicate column name `{0}`")]
    DuplicateColumn(String),

    #[error("column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column `{column}` is declared {declared:?} but holds a {found:?} value")]
    ValueTypeMismatch {
        column: String,
        declared: DataType,
        found: DataType,
    },
}

/// Failures while turning one authorization extract into records.
///
/// `FilenameDate` is recoverable at the pipeline level (the file is skipped
/// with a warning); `MissingColumn` aborts the run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("filename `{0}` does not carry a YYYY-MM-DD report date")]
    FilenameDate(String),

    #[error("required column `{column}` missing from `{file}`")]
    MissingColumn { column: String, file: String },
}

impl ExtractError {
    /// True when the pipeline should skip the file rather than abort.
    pub fn is_skip(&self) -> bool {
        matches!(self, ExtractError::FilenameDate(_))
    }
}
