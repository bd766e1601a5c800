use std::collections::{HashMap, HashSet};

use gridsheet_engine::engine::{Position, Size};
use tracing::trace;

use crate::cell::Cell;

/// A grid of optionally occupied cell slots.
///
/// Storage is a rectangle of `extent.rows` rows, each `extent.cols` slots
/// wide. `extent` is the tight bounding box of the occupied slots: the last
/// row and the last column each hold at least one cell, and an unoccupied
/// sheet has extent `0x0`.
///
/// Incoming edges live in `dependents` rather than in the cells, keyed by the
/// position being read. A formula may read a vacant slot (one that was
/// cleared); the edge stays registered so a later write to that position
/// still invalidates the formula.
#[derive(Debug, Default)]
pub struct Sheet {
    /// Row-major slots.
    pub(crate) cells: Vec<Vec<Option<Box<Cell>>>>,
    /// Printable size.
    pub(crate) extent: Size,
    /// For each position, the cells whose formulas read it. Never holds an
    /// empty set.
    pub(crate) dependents: HashMap<Position, HashSet<Position>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tight bounding box of all occupied slots.
    pub fn printable_size(&self) -> Size {
        self.extent
    }

    pub(crate) fn slot(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.row)?.get(pos.col)?.as_deref()
    }

    pub(crate) fn slot_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.cells.get_mut(pos.row)?.get_mut(pos.col)?.as_deref_mut()
    }

    /// Cells whose formulas read `pos`, whether or not `pos` is occupied.
    pub(crate) fn dependents_of(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents.get(&pos).into_iter().flatten().copied()
    }

    /// Occupied slots in row-major order.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(col, slot)| slot.as_deref().map(|c| (Position::new(row, col), c)))
        })
    }

    /// Grow storage (never shrink) so that `pos` is addressable.
    fn grow_to_cover(&mut self, pos: Position) {
        let rows = self.extent.rows.max(pos.row + 1);
        let cols = self.extent.cols.max(pos.col + 1);
        if rows == self.extent.rows && cols == self.extent.cols {
            return;
        }

        self.cells.resize_with(rows, Vec::new);
        for row in &mut self.cells {
            row.resize_with(cols, || None);
        }
        trace!(from = %self.extent, to = %Size::new(rows, cols), "grew sheet");
        self.extent = Size::new(rows, cols);
    }

    /// Return the cell at `pos`, creating an empty one if the slot is vacant.
    pub(crate) fn ensure_cell(&mut self, pos: Position) -> &mut Cell {
        self.grow_to_cover(pos);
        let slot = &mut self.cells[pos.row][pos.col];
        if slot.is_none() {
            trace!(cell = %pos, "created cell");
        }
        &mut **slot.get_or_insert_with(|| Box::new(Cell::new_empty()))
    }

    /// Vacate the slot at `pos`. Callers unlink the cell's edges first.
    pub(crate) fn take_slot(&mut self, pos: Position) -> Option<Box<Cell>> {
        self.cells.get_mut(pos.row)?.get_mut(pos.col)?.take()
    }

    /// Drop trailing empty rows, then trailing empty columns, until the
    /// extent is tight again.
    pub(crate) fn shrink_to_fit(&mut self) {
        let before = self.extent;

        while self
            .cells
            .last()
            .is_some_and(|row| row.iter().all(Option::is_none))
        {
            self.cells.pop();
        }
        let rows = self.cells.len();

        let mut cols = if rows == 0 { 0 } else { self.extent.cols };
        while cols > 0 && self.cells.iter().all(|row| row[cols - 1].is_none()) {
            cols -= 1;
        }
        for row in &mut self.cells {
            row.truncate(cols);
        }

        self.extent = Size::new(rows, cols);
        if self.extent != before {
            trace!(from = %before, to = %self.extent, "shrank sheet");
        }
    }
}
