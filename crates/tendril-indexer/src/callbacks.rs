//! Progress and error hooks invoked by the graph builder

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Hooks called synchronously by the builder's coordinator.
///
/// All methods default to doing nothing so implementors only override what
/// they care about.
pub trait BuildCallbacks: Send + Sync {
    /// A parse for `id` has been scheduled.
    fn on_start(&self, _id: &str) {}
    /// `from` directly depends on `to`.
    fn on_edge(&self, _from: &str, _to: &str) {}
    /// `id` was parsed successfully.
    fn on_finish(&self, _id: &str) {}
    /// Parsing `id` failed.
    fn on_error(&self, _id: &str, _error: &anyhow::Error) {}
}

/// Callbacks that ignore every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl BuildCallbacks for NoopCallbacks {}

/// Reports build progress through `tracing`, with paths relative to `root`.
#[derive(Debug, Clone)]
pub struct LogCallbacks {
    root: PathBuf,
}

impl LogCallbacks {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LogCallbacks { root: root.into() }
    }

    fn display<'a>(&self, id: &'a str) -> std::borrow::Cow<'a, str> {
        match Path::new(id).strip_prefix(&self.root) {
            Ok(relative) => relative.to_string_lossy().into_owned().into(),
            Err(_) => id.into(),
        }
    }
}

impl BuildCallbacks for LogCallbacks {
    fn on_start(&self, id: &str) {
        debug!("Parsing {}", self.display(id));
    }

    fn on_edge(&self, from: &str, to: &str) {
        debug!("{} -> {}", self.display(from), self.display(to));
    }

    fn on_finish(&self, id: &str) {
        debug!("Parsed {}", self.display(id));
    }

    fn on_error(&self, id: &str, error: &anyhow::Error) {
        warn!("Failed to parse {}: {:#}", self.display(id), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_callbacks_display_relative() {
        let callbacks = LogCallbacks::new("/repo");
        assert_eq!(callbacks.display("/repo/src/a.ts"), "src/a.ts");
        assert_eq!(callbacks.display("/elsewhere/b.ts"), "/elsewhere/b.ts");
    }
}
