//! Error types for Gridsheet core.

use thiserror::Error;

use gridsheet_engine::engine::{FormulaParseError, Position};

/// Reasons an operation on a [`crate::Sheet`] was rejected. The sheet is left
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid position {0}")]
    InvalidPosition(Position),

    #[error("Malformed formula: {0}")]
    MalformedFormula(#[from] FormulaParseError),

    #[error("Circular dependency detected: {}", format_path(.path))]
    CircularDependency { cell: Position, path: Vec<Position> },
}

fn format_path(path: &[Position]) -> String {
    path.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, SheetError>;
