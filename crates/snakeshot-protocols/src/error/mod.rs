//! Error types for the snakeshot protocol layer.

mod grid;
mod protocol;
mod ui;

pub use grid::*;
pub use protocol::*;
pub use ui::*;
