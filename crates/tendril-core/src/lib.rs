//! Dependency graph store, cycle detection, explain and export

pub mod graph;
pub mod model;
pub mod cycles;
pub mod explain;
pub mod export;
pub mod error;


#[cfg(test)]
pub mod test_utils;

pub use model::{Node, FileInfo, relative_display};
pub use graph::Graph;
pub use cycles::{Cycles, load_cycles};
pub use explain::{explain, explanation_lines};
pub use export::{ExportDocument, ExportNode, ExportLink, export_graph, render_html, GRAPH_PLACEHOLDER};
pub use error::{GraphError, ExportError};
