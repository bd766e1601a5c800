//! Sheet state and logic.

mod graph;
mod ops;
mod print;
mod state;
mod view;

pub use state::Sheet;
pub use view::CellView;
