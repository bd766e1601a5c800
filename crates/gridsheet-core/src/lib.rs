//! gridsheet-core - Sheet model: cells, dependency graph and grid extent.

pub mod cell;
pub mod error;
pub mod sheet;

pub use cell::{Cell, Content, FormulaContent};
pub use error::{Result, SheetError};
pub use sheet::{CellView, Sheet};

pub use gridsheet_engine::engine::{CellValue, FormulaError, Position, Size};
