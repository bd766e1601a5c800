//! Cell values and formula-level errors.

use std::fmt;

use super::Position;

/// Text every formula error renders as, whatever its category.
pub const FORMULA_ERROR_MARKER: &str = "#ARITHM!";

/// The kind of failure a formula evaluation ran into.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FormulaErrorCategory {
    /// A reference points outside the sheet.
    Ref,
    /// A referenced value cannot be used as a number.
    Value,
    /// Arithmetic produced a non-finite result (e.g. division by zero).
    Arithmetic,
}

/// An error produced while evaluating a formula. This is a value, not a failure
/// of the edit that stored the formula.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct FormulaError {
    category: FormulaErrorCategory,
}

impl FormulaError {
    pub fn new(category: FormulaErrorCategory) -> FormulaError {
        FormulaError { category }
    }

    pub fn category(&self) -> FormulaErrorCategory {
        self.category
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FORMULA_ERROR_MARKER)
    }
}

impl std::error::Error for FormulaError {}

/// What evaluating a formula yields.
pub type FormulaValue = Result<f64, FormulaError>;

/// The observable result of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl CellValue {
    /// Coerce the value into a formula operand.
    ///
    /// Empty text counts as zero, other text must parse fully as a finite number.
    pub fn to_number(&self) -> FormulaValue {
        match self {
            CellValue::Number(n) => Ok(*n),
            CellValue::Error(e) => Err(*e),
            CellValue::Text(s) if s.is_empty() => Ok(0.0),
            CellValue::Text(s) => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(n),
                _ => Err(FormulaError::new(FormulaErrorCategory::Value)),
            },
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            Ok(n) => CellValue::Number(n),
            Err(e) => CellValue::Error(e),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Read access to the values of other cells, as needed by formula evaluation.
pub trait CellLookup {
    /// The value at `pos`, or `None` when no cell exists there.
    fn lookup(&self, pos: Position) -> Option<CellValue>;
}
