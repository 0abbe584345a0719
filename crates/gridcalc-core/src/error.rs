//! Error types for Gridcalc core.

use thiserror::Error;

/// Errors that can occur while editing, saving or loading a sheet
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Cell ({col}, {row}) is outside the sheet")]
    OutOfBounds { col: usize, row: usize },

    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
