//! Parsed formulas.
//!
//! A [`Formula`] is built from the text after the leading `=` of a cell. It
//! knows its normalized expression text, the cells it reads, and how to
//! evaluate itself against any [`CellLookup`].

use std::fmt;
use std::str::FromStr;

use super::ast::Expr;
use super::parser::parse_expression;
use super::{CellLookup, FormulaParseError, FormulaValue, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
    /// Sorted, deduplicated, in-bounds references.
    references: Vec<Position>,
}

impl Formula {
    pub fn parse(expression: &str) -> Result<Formula, FormulaParseError> {
        let expr = parse_expression(expression)?;

        let mut references = Vec::new();
        expr.collect_cells(&mut references);
        references.retain(Position::is_valid);
        references.sort_unstable();
        references.dedup();

        Ok(Formula { expr, references })
    }

    /// The expression in canonical form (no whitespace, minimal parentheses).
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// Cells the expression reads. References outside the sheet are left out;
    /// they evaluate to a `#REF!` error instead.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    pub fn evaluate(&self, lookup: &dyn CellLookup) -> FormulaValue {
        self.expr.evaluate(lookup)
    }
}

impl FromStr for Formula {
    type Err = FormulaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
