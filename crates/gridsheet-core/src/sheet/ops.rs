use gridsheet_engine::engine::Position;
use tracing::{debug, trace};

use super::{CellView, Sheet};
use crate::cell::Content;
use crate::error::{Result, SheetError};

fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(SheetError::InvalidPosition(pos))
    }
}

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The new content is parsed and checked for cycles before anything is
    /// touched; on error the sheet is unchanged. On success the cell (and any
    /// cell the formula reads) is created if needed, the dependency edges are
    /// rewired, and every cell that depends on `pos` loses its cached value.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        check_position(pos)?;

        let content = Content::from_input(text).inspect_err(|err| {
            debug!(cell = %pos, error = %err, "rejected edit");
        })?;

        let refs = content.referenced_cells().to_vec();
        if !refs.is_empty() {
            if let Some(path) = self.find_cycle(pos, &refs) {
                let err = SheetError::CircularDependency { cell: pos, path };
                debug!(cell = %pos, error = %err, "rejected edit");
                return Err(err);
            }
        }

        self.ensure_cell(pos);
        for &dep in &refs {
            if self.slot(dep).is_none() {
                trace!(cell = %dep, referenced_by = %pos, "auto-creating referenced cell");
                self.ensure_cell(dep);
            }
        }
        self.replace_dependencies(pos, &refs);
        self.ensure_cell(pos).content = content;
        self.invalidate_dependents(pos);

        Ok(())
    }

    /// Look up the cell at `pos`. Returns `Ok(None)` for a vacant slot.
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        check_position(pos)?;
        Ok(self.slot(pos).map(|cell| CellView::new(self, pos, cell)))
    }

    /// Clear the cell at `pos`. Clearing a vacant slot does nothing.
    ///
    /// The cell is removed and the extent shrinks to fit the remaining cells.
    /// Formulas that read `pos` now see it as empty.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;

        if self.destroy_cell(pos).is_none() {
            return Ok(());
        }
        self.invalidate_dependents(pos);
        self.shrink_to_fit();

        Ok(())
    }
}
