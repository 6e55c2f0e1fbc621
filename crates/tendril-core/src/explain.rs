//! Path-relevant edge extraction between two node sets

use std::collections::HashSet;

use crate::graph::Graph;
use crate::model::{FileInfo, Node};
use petgraph::Direction;

/// Every edge lying on some path from a node in `from_ids` to a node in
/// `to_ids`.
///
/// An edge (u, v) qualifies when u is reachable from the "from" set and v can
/// reach the "to" set; that is exactly the union of all such paths, cycles
/// included. A disconnected query yields an empty vector. Edges come back in
/// [`Graph::edges`] order; sorting for display is up to the caller.
pub fn explain<'a, P, S: AsRef<str>>(
    graph: &'a Graph<P>,
    from_ids: &[S],
    to_ids: &[S],
) -> Vec<(&'a Node<P>, &'a Node<P>)> {
    let forward = graph.reachable(from_ids, Direction::Outgoing);
    if forward.is_empty() {
        return Vec::new();
    }
    let backward = graph.reachable(to_ids, Direction::Incoming);

    let mut edges = Vec::new();
    for source in graph.node_indices().filter(|idx| forward.contains(idx)) {
        for target in graph.neighbor_indices(source, Direction::Outgoing) {
            if backward.contains(&target) {
                edges.push((graph.node_at(source), graph.node_at(target)));
            }
        }
    }

    tracing::debug!(
        "explain: {} forward, {} backward, {} edges",
        forward.len(),
        backward.len(),
        edges.len()
    );
    edges
}

/// One sorted line per edge, `from -> to`.
///
/// When the edges touch more than one package every side is prefixed with
/// its package label, `package@path`. Files without a package never count
/// as a package of their own.
pub fn explanation_lines(
    edges: &[(&Node<FileInfo>, &Node<FileInfo>)],
    display: impl Fn(&Node<FileInfo>) -> String,
) -> Vec<String> {
    let packages: HashSet<&str> = edges
        .iter()
        .flat_map(|(from, to)| [from.data.package.as_str(), to.data.package.as_str()])
        .filter(|package| !package.is_empty())
        .collect();
    let grouped = packages.len() > 1;

    // Unparsed leaves carry no package and are never prefixed
    let side = |node: &Node<FileInfo>| {
        if grouped && !node.data.package.is_empty() {
            format!("{}@{}", node.data.package_label(), display(node))
        } else {
            display(node)
        }
    };

    let mut lines: Vec<String> = edges
        .iter()
        .map(|(from, to)| format!("{} -> {}", side(from), side(to)))
        .collect();
    lines.sort();
    lines
}
