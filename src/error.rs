use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading or reshaping a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to parse CSV: {0}")]
    Parse(String),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("failed to parse '{value}' as number in column '{column}' at row {row}")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("{operation} needs at least {needed} rows, got {got}")]
    InsufficientData {
        operation: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("x and y must have the same length (x: {x}, y: {y})")]
    LengthMismatch { x: usize, y: usize },

    #[error("linear fit is undefined: all x values are equal")]
    DegenerateFit,

    #[error("invalid predicate '{0}'")]
    InvalidPredicate(String),
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Parse(err.to_string())
    }
}
