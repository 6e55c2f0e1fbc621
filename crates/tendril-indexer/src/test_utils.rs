//! Test utilities for tendril-indexer

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::bail;
use tempfile::TempDir;
use tendril_core::Node;

use crate::callbacks::BuildCallbacks;
use crate::parser::{NodeParser, Parsed};

/// A temporary source tree. Paths handed out are canonical so they match
/// the identities produced by the parser.
pub struct TestRepo {
    _dir: TempDir,
    root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        TestRepo { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn id(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().into_owned()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Create a small TypeScript project with a cycle between `a` and `b`:
///
/// ```text
/// src/index.ts -> src/a.ts -> src/b.ts -> src/a.ts
///              -> src/util/log.ts
/// src/b.ts     -> src/util/log.ts
/// ```
pub fn create_test_repo() -> TestRepo {
    let repo = TestRepo::new();
    repo.write("package.json", r#"{ "name": "@acme/app" }"#);
    repo.write(
        "src/index.ts",
        "import { a } from './a';\nimport { log } from './util/log';\n\nlog(a());\n",
    );
    repo.write("src/a.ts", "import { b } from './b';\n\nexport const a = () => b();\n");
    repo.write(
        "src/b.ts",
        "import { a } from './a';\nimport { log } from './util/log';\n\nexport const b = () => { log('b'); return a; };\n",
    );
    repo.write("src/util/log.ts", "export const log = console.log;\n");
    repo
}

/// A parser backed by an in-memory adjacency table. Identities missing from
/// the table parse to no references; identities in `failing` return an
/// error and identities in `panicking` panic.
#[derive(Default)]
pub struct MapParser {
    pub edges: HashMap<String, Vec<String>>,
    pub failing: Vec<String>,
    pub panicking: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub delay: Option<std::time::Duration>,
}

impl MapParser {
    pub fn new(edges: &[(&str, &[&str])]) -> Self {
        MapParser {
            edges: edges
                .iter()
                .map(|(from, to)| (from.to_string(), to.iter().map(|t| t.to_string()).collect()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn panicking(mut self, ids: &[&str]) -> Self {
        self.panicking = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self, id: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == id).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl NodeParser for MapParser {
    type Payload = String;

    fn parse(&self, id: &str) -> anyhow::Result<Parsed<String>> {
        self.calls.lock().unwrap().push(id.to_string());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.panicking.iter().any(|p| p == id) {
            panic!("parser exploded on {id}");
        }
        if self.failing.iter().any(|f| f == id) {
            bail!("cannot parse {id}");
        }
        Ok(Parsed {
            payload: format!("parsed:{id}"),
            references: self.edges.get(id).cloned().unwrap_or_default(),
        })
    }

    fn display(&self, node: &Node<String>) -> String {
        node.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    Edge(String, String),
    Finish(String),
    Error(String),
}

/// Callbacks that record every event they receive.
#[derive(Default)]
pub struct RecordingCallbacks {
    pub events: Mutex<Vec<Event>>,
    pub errors: AtomicUsize,
}

impl RecordingCallbacks {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

impl BuildCallbacks for RecordingCallbacks {
    fn on_start(&self, id: &str) {
        self.events.lock().unwrap().push(Event::Start(id.to_string()));
    }

    fn on_edge(&self, from: &str, to: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Edge(from.to_string(), to.to_string()));
    }

    fn on_finish(&self, id: &str) {
        self.events.lock().unwrap().push(Event::Finish(id.to_string()));
    }

    fn on_error(&self, id: &str, _error: &anyhow::Error) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(Event::Error(id.to_string()));
    }
}
