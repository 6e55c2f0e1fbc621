//! Graph wrapper using petgraph::DiGraph keyed by string identities

use crate::error::GraphError;
use crate::model::Node;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed, Walker};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// The dependency graph, a directed graph without parallel edges.
///
/// Nodes are never removed, so petgraph's indices double as insertion order.
pub struct Graph<P> {
    inner: DiGraph<Node<P>, ()>,
    index: HashMap<String, NodeIndex>,
}

impl<P> std::fmt::Debug for Graph<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl<P> Graph<P> {
    pub fn new() -> Self {
        Graph {
            inner: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node to the graph. If the identity is already present the
    /// existing node is returned and `data` is dropped.
    pub fn add_node(&mut self, id: impl Into<String>, data: P) -> &Node<P> {
        let id = id.into();
        let idx = match self.index.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.inner.add_node(Node::new(id.clone(), data));
                self.index.insert(id, idx);
                idx
            }
        };
        &self.inner[idx]
    }

    /// Add an edge between two existing nodes. Adding it twice is a no-op.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;
        if self.inner.find_edge(source, target).is_none() {
            self.inner.add_edge(source, target, ());
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownEndpoint(id.to_string()))
    }

    /// Get a node by identity.
    pub fn get(&self, id: &str) -> Option<&Node<P>> {
        self.index.get(id).map(|&idx| &self.inner[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// All nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node<P>> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// Direct successors of `id` in edge insertion order.
    pub fn from_id(&self, id: &str) -> Vec<&Node<P>> {
        self.neighbors_of(id, Direction::Outgoing)
    }

    /// Direct predecessors of `id` in edge insertion order.
    pub fn to_id(&self, id: &str) -> Vec<&Node<P>> {
        self.neighbors_of(id, Direction::Incoming)
    }

    fn neighbors_of(&self, id: &str, dir: Direction) -> Vec<&Node<P>> {
        match self.index.get(id) {
            Some(&idx) => self
                .neighbor_indices(idx, dir)
                .into_iter()
                .map(|n| &self.inner[n])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every edge, grouped by source in `all_nodes` order.
    pub fn edges(&self) -> impl Iterator<Item = (&Node<P>, &Node<P>)> {
        self.inner.node_indices().flat_map(move |source| {
            self.neighbor_indices(source, Direction::Outgoing)
                .into_iter()
                .map(move |target| (&self.inner[source], &self.inner[target]))
        })
    }

    // petgraph lists neighbors newest first.
    pub(crate) fn neighbor_indices(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.inner.neighbors_directed(idx, dir).collect();
        neighbors.reverse();
        neighbors
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.inner.node_indices()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node<P> {
        &self.inner[idx]
    }

    /// Indices reachable from any of `ids` (inclusive) following edges in
    /// `dir`. Unknown identities are ignored.
    pub(crate) fn reachable<S: AsRef<str>>(&self, ids: &[S], dir: Direction) -> HashSet<NodeIndex> {
        let mut reached = HashSet::new();
        for idx in ids.iter().filter_map(|id| self.index.get(id.as_ref()).copied()) {
            if reached.contains(&idx) {
                continue;
            }
            match dir {
                Direction::Outgoing => reached.extend(Dfs::new(&self.inner, idx).iter(&self.inner)),
                Direction::Incoming => {
                    let reversed = Reversed(&self.inner);
                    reached.extend(Dfs::new(reversed, idx).iter(reversed));
                }
            }
        }
        reached
    }
}

impl<P> Default for Graph<P> {
    fn default() -> Self {
        Self::new()
    }
}
