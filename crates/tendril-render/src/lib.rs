//! Terminal rendering of dependency graphs

pub mod board;
pub mod graphics;


pub use board::Board;
pub use graphics::{CellStack, Lines};
