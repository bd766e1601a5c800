//! Command scripts: one `CELL: TEXT` edit per line.
//!
//! ```text
//! # comment
//! A1: 5
//! B1: =A1*2
//! A1:
//! ```
//!
//! A line with nothing after the colon clears the cell.

use gridsheet_core::{Position, Sheet, SheetError};

use crate::error::{GridsheetError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
}

/// A command tagged with its 1-based source line.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. The first malformed line aborts parsing.
pub fn parse_script(content: &str) -> Result<Vec<ScriptLine>> {
    let mut commands = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(colon_pos) = line.find(':') else {
            return Err(GridsheetError::Parse {
                line: line_num + 1,
                message: format!("Expected 'CELL: TEXT', got: {}", line),
            });
        };

        let cell_ref = line[..colon_pos].trim();
        let text = line[colon_pos + 1..].trim();

        let pos = Position::from_a1(cell_ref).ok_or_else(|| GridsheetError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", cell_ref),
        })?;

        let command = if text.is_empty() {
            Command::Clear(pos)
        } else {
            Command::Set(pos, text.to_string())
        };
        commands.push(ScriptLine {
            line: line_num + 1,
            command,
        });
    }

    Ok(commands)
}

/// Apply parsed commands in order. Rejected edits leave the sheet untouched
/// and are returned alongside their line numbers; later commands still run.
pub fn apply(sheet: &mut Sheet, script: &[ScriptLine]) -> Vec<(usize, SheetError)> {
    let mut failures = Vec::new();
    for entry in script {
        let result = match &entry.command {
            Command::Set(pos, text) => sheet.set_cell(*pos, text),
            Command::Clear(pos) => sheet.clear_cell(*pos),
        };
        if let Err(e) = result {
            failures.push((entry.line, e));
        }
    }
    failures
}
