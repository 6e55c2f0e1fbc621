//! Orchestrates parallel graph construction
//!
//! A single coordinating task owns the work queue, the visited set and every
//! parse result. Parses run on tokio's blocking pool, at most `workers` at a
//! time, and report back through a `JoinSet`. Because only the coordinator
//! touches shared state, each identity is scheduled at most once no matter
//! how many files import it.
//!
//! Completion order is nondeterministic, so the graph itself is assembled
//! after the last parse finishes: breadth first from the seeds, following
//! references in the order each parser returned them. Two builds over the
//! same inputs therefore produce identical node and edge orders.

use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use tendril_core::{Graph, GraphError};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::callbacks::{BuildCallbacks, NoopCallbacks};
use crate::error::{BuildError, ParseFailure};
use crate::filter::PatternFilter;
use crate::parser::{NodeParser, Parsed};

/// What to do when a parse fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop scheduling, drain in-flight parses and fail the build.
    #[default]
    Abort,
    /// Record the failure and keep the identity as a leaf.
    Continue,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum number of parses in flight.
    pub workers: usize,
    pub on_error: ErrorPolicy,
    /// When set, only matching identities are parsed; everything else that
    /// gets discovered becomes a leaf.
    pub filter: Option<PatternFilter>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            workers: default_workers(),
            on_error: ErrorPolicy::default(),
            filter: None,
        }
    }
}

/// Number of CPU cores, but at least 2.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().max(2))
        .unwrap_or(2)
}

/// Result of a build. The graph is always present, even when the build was
/// cancelled or aborted, and holds whatever had been discovered by then.
#[derive(Debug)]
pub struct BuildOutput<P> {
    pub graph: Graph<P>,
    /// Every parse failure, in the order they were observed.
    pub failures: Vec<ParseFailure>,
    pub error: Option<BuildError>,
}

impl<P> BuildOutput<P> {
    pub fn into_result(self) -> Result<Graph<P>, BuildError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.graph),
        }
    }
}

type TaskOutput<P> = (String, anyhow::Result<Parsed<P>>);

enum Event<P> {
    Joined(Option<Result<TaskOutput<P>, JoinError>>),
    Cancelled,
    SignalClosed,
    Idle,
}

/// Builds a dependency graph by repeatedly parsing identities and following
/// their references.
pub struct GraphBuilder<T: NodeParser> {
    parser: Arc<T>,
    callbacks: Arc<dyn BuildCallbacks>,
    options: BuildOptions,
    cancel: Option<watch::Receiver<bool>>,
}

impl<T: NodeParser> GraphBuilder<T> {
    pub fn new(parser: Arc<T>) -> Self {
        GraphBuilder {
            parser,
            callbacks: Arc::new(NoopCallbacks),
            options: BuildOptions::default(),
            cancel: None,
        }
    }

    pub fn with_callbacks(mut self, callbacks: Arc<dyn BuildCallbacks>) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop the build as soon as `true` is sent on this channel. Parses
    /// already running are allowed to finish but nothing new is scheduled.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the graph reachable from `seeds`.
    ///
    /// Duplicate seeds are ignored. Seeds are always parsed, even when a
    /// filter is configured.
    pub async fn load_graph<I, S>(&self, seeds: I) -> BuildOutput<T::Payload>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut visited: HashSet<String> = HashSet::new();
        let mut seed_order = Vec::new();
        for seed in seeds {
            let seed = seed.into();
            if visited.insert(seed.clone()) {
                seed_order.push(seed);
            }
        }

        let workers = self.options.workers.max(1);
        let mut queue: VecDeque<String> = seed_order.iter().cloned().collect();
        let mut payloads: HashMap<String, T::Payload> = HashMap::new();
        let mut references: HashMap<String, Vec<String>> = HashMap::new();
        let mut failures = Vec::new();
        let mut tasks: JoinSet<TaskOutput<T::Payload>> = JoinSet::new();

        let mut cancel = self.cancel.clone();
        let mut cancelled = cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let mut aborting = false;
        let mut join_error = None;

        debug!("Building graph from {} seed(s) with {} worker(s)", seed_order.len(), workers);

        loop {
            if !cancelled && !aborting {
                while tasks.len() < workers {
                    let Some(id) = queue.pop_front() else { break };
                    self.callbacks.on_start(&id);
                    let parser = Arc::clone(&self.parser);
                    tasks.spawn_blocking(move || {
                        let result = panic::catch_unwind(AssertUnwindSafe(|| parser.parse(&id)))
                            .unwrap_or_else(|panic| {
                                Err(anyhow!("parser panicked: {}", panic_message(&*panic)))
                            });
                        (id, result)
                    });
                }
            }

            if tasks.is_empty() {
                break;
            }

            let event = match cancel.as_mut() {
                Some(rx) if !cancelled => tokio::select! {
                    joined = tasks.join_next() => Event::Joined(joined),
                    changed = rx.changed() => match changed {
                        Ok(()) if *rx.borrow() => Event::Cancelled,
                        Ok(()) => Event::Idle,
                        Err(_) => Event::SignalClosed,
                    },
                },
                _ => Event::Joined(tasks.join_next().await),
            };

            match event {
                Event::Cancelled => {
                    info!("Cancellation requested, waiting for {} in-flight parse(s)", tasks.len());
                    cancelled = true;
                }
                Event::SignalClosed => cancel = None,
                Event::Idle | Event::Joined(None) => {}
                Event::Joined(Some(Err(err))) => {
                    warn!("Parse task failed to complete: {}", err);
                    aborting = true;
                    join_error.get_or_insert(err);
                }
                Event::Joined(Some(Ok((id, Ok(parsed))))) => {
                    let mut seen = HashSet::new();
                    let mut refs = Vec::with_capacity(parsed.references.len());
                    for reference in parsed.references {
                        if !seen.insert(reference.clone()) {
                            continue;
                        }
                        self.callbacks.on_edge(&id, &reference);
                        if visited.insert(reference.clone()) {
                            if self.is_expandable(&reference) {
                                queue.push_back(reference.clone());
                            } else {
                                debug!("Not expanding filtered {}", reference);
                            }
                        }
                        refs.push(reference);
                    }
                    payloads.insert(id.clone(), parsed.payload);
                    references.insert(id.clone(), refs);
                    self.callbacks.on_finish(&id);
                }
                Event::Joined(Some(Ok((id, Err(err))))) => {
                    self.callbacks.on_error(&id, &err);
                    failures.push(ParseFailure { id, message: format!("{err:#}") });
                    if self.options.on_error == ErrorPolicy::Abort && !aborting {
                        info!("Aborting build after parse failure");
                        aborting = true;
                    }
                }
            }
        }

        let graph = match assemble(&seed_order, payloads, &references) {
            Ok(graph) => graph,
            Err(err) => {
                return BuildOutput {
                    graph: Graph::new(),
                    failures,
                    error: Some(err.into()),
                }
            }
        };

        let error = if let Some(err) = join_error {
            Some(BuildError::Join(err))
        } else if cancelled {
            Some(BuildError::Cancelled)
        } else if aborting {
            Some(BuildError::Parse(failures.clone()))
        } else {
            None
        };

        info!(
            "Built graph with {} nodes and {} edges ({} parse failure(s))",
            graph.node_count(),
            graph.edge_count(),
            failures.len()
        );

        BuildOutput { graph, failures, error }
    }

    fn is_expandable(&self, id: &str) -> bool {
        self.options.filter.as_ref().map_or(true, |filter| filter.matches(id))
    }
}

/// Lay the results out as a graph, breadth first from the seeds. Identities
/// that were discovered but never parsed get a default payload and no edges.
fn assemble<P: Default>(
    seeds: &[String],
    mut payloads: HashMap<String, P>,
    references: &HashMap<String, Vec<String>>,
) -> Result<Graph<P>, GraphError> {
    let mut graph = Graph::new();
    let mut queue = VecDeque::new();

    for seed in seeds {
        if !graph.contains(seed) {
            graph.add_node(seed.as_str(), payloads.remove(seed).unwrap_or_default());
            queue.push_back(seed.as_str());
        }
    }

    while let Some(id) = queue.pop_front() {
        let Some(refs) = references.get(id) else { continue };
        for reference in refs {
            if !graph.contains(reference) {
                graph.add_node(reference.as_str(), payloads.remove(reference).unwrap_or_default());
                queue.push_back(reference.as_str());
            }
            graph.add_edge(id, reference)?;
        }
    }

    Ok(graph)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
