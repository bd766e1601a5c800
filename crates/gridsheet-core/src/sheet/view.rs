use gridsheet_engine::engine::{CellLookup, CellValue, Position};

use super::Sheet;
use crate::cell::{Cell, Content};

/// Read-only handle on one occupied cell of a [`Sheet`].
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(sheet: &'a Sheet, pos: Position, cell: &'a Cell) -> CellView<'a> {
        CellView { sheet, pos, cell }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn content(&self) -> &'a Content {
        &self.cell.content
    }

    /// The text the cell was set to (formulas normalized, `=`-prefixed).
    pub fn text(&self) -> String {
        self.cell.content.text()
    }

    /// The displayed value, evaluating the formula if its cache is cold.
    pub fn value(&self) -> CellValue {
        self.sheet.value_of(self.pos, self.cell)
    }

    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.content.referenced_cells()
    }

    /// Cells this cell reads.
    pub fn dependencies(&self) -> impl Iterator<Item = Position> + 'a {
        self.cell.depends_on.iter().copied()
    }

    /// Cells that read this cell.
    pub fn dependents(&self) -> impl Iterator<Item = Position> + 'a {
        self.sheet.dependents_of(self.pos)
    }
}

impl CellLookup for Sheet {
    fn lookup(&self, pos: Position) -> Option<CellValue> {
        self.slot(pos).map(|cell| self.value_of(pos, cell))
    }
}

impl Sheet {
    /// Value of `cell`, which sits at `pos`. Cold dependencies are filled
    /// bottom-up first.
    pub(crate) fn value_of(&self, pos: Position, cell: &Cell) -> CellValue {
        self.warm_caches(pos);
        cell.content.value(self)
    }

    /// Iterate over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellView<'_>> {
        self.occupied()
            .map(move |(pos, cell)| CellView::new(self, pos, cell))
    }
}
