//! Terminal board: one row per node, edges routed through vertical lanes
//!
//! ```text
//! a╶─┬───┐
//! b◁─┴─┐ │
//! c◁───┴─┘
//! ```
//!
//! Rows are ordered by dependency level. Every edge leaves its source row
//! with a stub, runs right to its lane, travels vertically and comes back
//! to an arrow on the target row.

use std::collections::{HashMap, VecDeque};

use colored::Colorize;
use tendril_core::{Cycles, Graph, Node};
use tracing::debug;

use crate::graphics::{CellStack, Lines};

pub const CYCLE_TAG: &str = "cycle";

#[derive(Debug, Clone)]
struct Route {
    from: usize,
    to: usize,
    cycle: bool,
}

impl Route {
    fn span(&self) -> (usize, usize) {
        (self.from.min(self.to), self.from.max(self.to))
    }
}

#[derive(Debug)]
pub struct Board {
    labels: Vec<String>,
    label_width: usize,
    cells: Vec<Vec<CellStack>>,
    lanes: usize,
}

impl Board {
    /// Lay out `graph`. `label` names each node's row; edges in `cycles`
    /// are excluded from the level computation and tagged `cycle=yes`.
    pub fn from_graph<P>(
        graph: &Graph<P>,
        cycles: &Cycles,
        label: impl Fn(&Node<P>) -> String,
    ) -> Self {
        let nodes: Vec<&Node<P>> = graph.all_nodes().collect();
        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();

        let levels = levels(graph, cycles, &nodes, &index);
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by_key(|&i| (levels[i], i));
        let mut row_of = vec![0; nodes.len()];
        for (row, &i) in order.iter().enumerate() {
            row_of[i] = row;
        }

        let mut routes = Vec::new();
        for (from, to) in graph.edges() {
            if from.id == to.id {
                continue;
            }
            let (Some(&f), Some(&t)) = (index.get(from.id.as_str()), index.get(to.id.as_str())) else {
                continue;
            };
            routes.push(Route {
                from: row_of[f],
                to: row_of[t],
                cycle: cycles.contains(&from.id, &to.id),
            });
        }
        routes.sort_by_key(|route| {
            let (lo, hi) = route.span();
            hi - lo
        });

        let assigned = assign_lanes(&routes);
        let lanes = assigned.iter().map(|&lane| lane + 1).max().unwrap_or(0);
        let width = if lanes == 0 { 0 } else { 2 * lanes + 1 };

        let labels: Vec<String> = order.iter().map(|&i| label(nodes[i])).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut board = Board {
            labels,
            label_width,
            cells: vec![vec![CellStack::new(); width]; nodes.len()],
            lanes,
        };

        for (route, &lane) in routes.iter().zip(&assigned) {
            board.draw(route, 2 + 2 * lane);
        }

        debug!("Laid out {} rows in {} lanes", board.cells.len(), lanes);
        board
    }

    fn draw(&mut self, route: &Route, column: usize) {
        let (upper, lower) = route.span();
        let cycle = route.cycle;

        for row in [route.from, route.to] {
            for col in 1..column {
                self.stroke(row, col, Lines::HORIZONTAL, cycle);
            }
        }
        self.stroke(route.from, 0, Lines::RIGHT, cycle);
        self.stroke(route.to, 0, Lines::NONE, cycle);
        if let Some(cell) = self.cell_mut(route.to, 0) {
            cell.place_arrow(true);
        }

        self.stroke(upper, column, Lines::TOP | Lines::LEFT, cycle);
        self.stroke(lower, column, Lines::BOTTOM | Lines::LEFT, cycle);
        for row in upper + 1..lower {
            self.stroke(row, column, Lines::NONE, cycle);
            if let Some(cell) = self.cell_mut(row, column) {
                cell.place_char('│');
            }
        }
    }

    fn stroke(&mut self, row: usize, col: usize, lines: Lines, cycle: bool) {
        if let Some(cell) = self.cell_mut(row, col) {
            cell.add_lines(lines);
            if cycle {
                cell.tag(CYCLE_TAG, "yes");
            }
        }
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut CellStack> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    /// Cell at `row`, `col`, with `col` counted from the first column
    /// right of the labels.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellStack> {
        self.cells.get(row)?.get(col)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Render the board, one line per row. With `color`, cells of cycle
    /// edges are drawn in red.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        for (label, cells) in self.labels.iter().zip(&self.cells) {
            let mut line = format!("{label:<width$}", width = self.label_width);
            for cell in cells {
                let glyph = cell.render();
                if color && cell.is(CYCLE_TAG, "yes") {
                    line.push_str(&glyph.to_string().red().to_string());
                } else {
                    line.push(glyph);
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Longest path from any source over the graph without its cycle edges.
fn levels<P>(
    graph: &Graph<P>,
    cycles: &Cycles,
    nodes: &[&Node<P>],
    index: &HashMap<&str, usize>,
) -> Vec<usize> {
    let mut successors = vec![Vec::new(); nodes.len()];
    let mut indegree = vec![0usize; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for next in graph.from_id(&node.id) {
            if cycles.contains(&node.id, &next.id) {
                continue;
            }
            let Some(&j) = index.get(next.id.as_str()) else { continue };
            successors[i].push(j);
            indegree[j] += 1;
        }
    }

    let mut level = vec![0usize; nodes.len()];
    let mut ready: VecDeque<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    while let Some(i) = ready.pop_front() {
        for &j in &successors[i] {
            level[j] = level[j].max(level[i] + 1);
            indegree[j] -= 1;
            if indegree[j] == 0 {
                ready.push_back(j);
            }
        }
    }
    level
}

/// Lowest lane whose rows do not overlap each route's inclusive span.
fn assign_lanes(routes: &[Route]) -> Vec<usize> {
    let mut occupied: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut assigned = Vec::with_capacity(routes.len());
    for route in routes {
        let (lo, hi) = route.span();
        let lane = occupied
            .iter()
            .position(|spans| spans.iter().all(|&(a, b)| hi < a || b < lo))
            .unwrap_or(occupied.len());
        if lane == occupied.len() {
            occupied.push(Vec::new());
        }
        occupied[lane].push((lo, hi));
        assigned.push(lane);
    }
    assigned
}
