//! Cycle detection over a finalized graph

use crate::graph::Graph;
use indexmap::IndexSet;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::HashMap;

/// Cycle-closing edges in the order the DFS discovered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cycles {
    edges: IndexSet<(String, String)>,
}

impl Cycles {
    /// Record a cycle-closing edge. Returns false if it was already known.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) -> bool {
        self.edges.insert((from.into(), to.into()))
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.edges.contains(&(from.to_string(), to.to_string()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().map(|(from, to)| (from.as_str(), to.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    cursor: usize,
}

impl Frame {
    fn enter<P>(graph: &Graph<P>, node: NodeIndex) -> Self {
        Frame {
            node,
            successors: graph.neighbor_indices(node, Direction::Outgoing),
            cursor: 0,
        }
    }
}

/// Find one back edge per dependency cycle.
///
/// Roots are taken in `all_nodes` order and successors in `from_id` order, so
/// the result is stable for a given graph. The walk keeps an explicit stack to
/// stay safe on deep import chains.
pub fn load_cycles<P>(graph: &Graph<P>) -> Cycles {
    let mut cycles = Cycles::default();
    let mut marks: HashMap<NodeIndex, Mark> = HashMap::with_capacity(graph.node_count());

    for root in graph.node_indices() {
        if marks.contains_key(&root) {
            continue;
        }
        marks.insert(root, Mark::InProgress);
        let mut stack = vec![Frame::enter(graph, root)];

        while let Some(frame) = stack.last_mut() {
            let Some(&next) = frame.successors.get(frame.cursor) else {
                marks.insert(frame.node, Mark::Done);
                stack.pop();
                continue;
            };
            frame.cursor += 1;
            let node = frame.node;

            match marks.get(&next).copied() {
                Some(Mark::InProgress) => {
                    let (from, to) = (&graph.node_at(node).id, &graph.node_at(next).id);
                    if cycles.insert(from.as_str(), to.as_str()) {
                        tracing::debug!("cycle closed by {} -> {}", from, to);
                    }
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::InProgress);
                    stack.push(Frame::enter(graph, next));
                }
            }
        }
    }

    cycles
}
