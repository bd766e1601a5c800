//! Cell data structures for the sheet grid.
//!
//! - [`Content`] - What a cell holds (empty, literal text, or a formula)
//! - [`FormulaContent`] - A parsed formula plus its lazily filled value cache
//! - [`Cell`] - Content together with the cells its formula reads

use std::collections::HashSet;

use gridsheet_engine::engine::{CellLookup, CellValue, Formula, FormulaValue, Position};

use crate::error::Result;

/// Leading character that marks the rest of the input as a formula.
pub const FORMULA_MARKER: char = '=';
/// Leading character that forces the rest of the input to be shown literally.
pub const ESCAPE_MARKER: char = '\'';

/// A formula and the last value it evaluated to.
#[derive(Debug)]
pub struct FormulaContent {
    formula: Formula,
    cache: std::cell::Cell<Option<FormulaValue>>,
}

impl FormulaContent {
    fn new(formula: Formula) -> FormulaContent {
        FormulaContent {
            formula,
            cache: std::cell::Cell::new(None),
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn cached_value(&self) -> Option<FormulaValue> {
        self.cache.get()
    }

    pub fn invalidate_cache(&self) {
        self.cache.set(None);
    }

    /// Return the cached value, evaluating against `lookup` on a miss.
    pub fn value(&self, lookup: &dyn CellLookup) -> FormulaValue {
        if let Some(value) = self.cache.get() {
            return value;
        }
        let value = self.formula.evaluate(lookup);
        self.cache.set(Some(value));
        value
    }
}

/// The payload of one cell.
#[derive(Debug)]
pub enum Content {
    Empty,
    Text(String),
    Formula(FormulaContent),
}

impl Content {
    /// Parse user input and create the matching content.
    /// - Empty string -> Empty
    /// - Starts with '=' and has more after it -> Formula (without the '=')
    /// - Otherwise -> Text, kept verbatim
    pub fn from_input(input: &str) -> Result<Content> {
        if input.is_empty() {
            return Ok(Content::Empty);
        }

        if let Some(expression) = input.strip_prefix(FORMULA_MARKER) {
            if !expression.is_empty() {
                let formula = Formula::parse(expression)?;
                return Ok(Content::Formula(FormulaContent::new(formula)));
            }
        }

        Ok(Content::Text(input.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }

    /// The text the content was entered as. Formulas come back normalized.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(s) => s.clone(),
            Content::Formula(f) => format!("{}{}", FORMULA_MARKER, f.formula.expression()),
        }
    }

    /// The displayed value. Formulas are evaluated against `lookup` unless cached.
    pub fn value(&self, lookup: &dyn CellLookup) -> CellValue {
        match self {
            Content::Empty => CellValue::Text(String::new()),
            Content::Text(s) => {
                let shown = s.strip_prefix(ESCAPE_MARKER).unwrap_or(s);
                CellValue::Text(shown.to_string())
            }
            Content::Formula(f) => f.value(lookup).into(),
        }
    }

    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Content::Empty | Content::Text(_) => &[],
            Content::Formula(f) => f.formula.referenced_cells(),
        }
    }

    pub fn cached_value(&self) -> Option<FormulaValue> {
        match self {
            Content::Formula(f) => f.cached_value(),
            Content::Empty | Content::Text(_) => None,
        }
    }

    pub fn invalidate_cache(&self) {
        if let Content::Formula(f) = self {
            f.invalidate_cache();
        }
    }
}

/// A cell in the sheet grid.
///
/// The cell only records its outgoing edges. Incoming edges are kept by the
/// owning sheet, keyed by position, so they outlive the cell when it is
/// cleared.
#[derive(Debug)]
pub struct Cell {
    pub(crate) content: Content,
    /// Cells this cell's formula reads.
    pub(crate) depends_on: HashSet<Position>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: Content::Empty,
            depends_on: HashSet::new(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn depends_on(&self) -> &HashSet<Position> {
        &self.depends_on
    }
}
