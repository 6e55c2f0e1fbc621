//! Test utilities for tendril-core

use crate::graph::Graph;

/// Build a payload-less graph from an edge list. Nodes are inserted in order
/// of first appearance.
pub fn graph_from_edges(edges: &[(&str, &str)]) -> Graph<()> {
    let mut graph = Graph::new();
    for (from, to) in edges {
        graph.add_node(*from, ());
        graph.add_node(*to, ());
    }
    for (from, to) in edges {
        graph.add_edge(from, to).unwrap();
    }
    graph
}

/// Identities of `graph` in `all_nodes` order.
pub fn node_ids<P>(graph: &Graph<P>) -> Vec<String> {
    graph.all_nodes().map(|n| n.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_from_edges_order() {
        let graph = graph_from_edges(&[("b", "a"), ("a", "c")]);
        assert_eq!(node_ids(&graph), vec!["b", "a", "c"]);
        assert_eq!(graph.edge_count(), 2);
    }
}
