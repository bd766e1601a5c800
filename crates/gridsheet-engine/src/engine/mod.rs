//! Formula engine API.
//!
//! This module provides everything the sheet needs from the formula language:
//!
//! - [`Position`], [`Size`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`Formula`] - Parsing, normalized printing and referenced cells
//! - [`CellValue`], [`FormulaError`] - Evaluation results
//! - [`CellLookup`] - How a formula reads the cells it references

mod ast;
mod error;
mod formula;
mod lexer;
mod parser;
mod position;
mod value;

pub use error::FormulaParseError;
pub use formula::Formula;
pub use position::{MAX_COLS, MAX_ROWS, Position, Size};
pub use value::{
    CellLookup, CellValue, FORMULA_ERROR_MARKER, FormulaError, FormulaErrorCategory,
    FormulaValue,
};
