//! Per-cell box drawing primitives

mod cell_stack;
mod lines;

pub use cell_stack::{Arrow, CellStack};
pub use lines::{Lines, GLYPHS};
