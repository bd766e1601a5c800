//! Tab-separated dumps of the printable area.

use std::io::{self, Write};

use gridsheet_engine::engine::Position;

use super::Sheet;
use crate::cell::Cell;

impl Sheet {
    /// Write every row of the printable area, one value per column,
    /// separated by tabs. Vacant slots print as empty strings.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |pos, cell| self.value_of(pos, cell).to_string())
    }

    /// Like [`Sheet::print_values`], but prints the cells' texts.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_with(out, |_, cell| cell.content.text())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(Position, &Cell) -> String,
    {
        for (row, slots) in self.cells.iter().enumerate() {
            for (col, slot) in slots.iter().enumerate() {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                if let Some(cell) = slot.as_deref() {
                    out.write_all(render(Position::new(row, col), cell).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
