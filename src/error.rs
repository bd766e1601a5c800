//! Error types for the gridsheet binary

use thiserror::Error;

/// Errors that abort a script run
#[derive(Error, Debug)]
pub enum GridsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, GridsheetError>;
