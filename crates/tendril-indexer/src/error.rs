//! Error types for graph builds
//!
//! A build can end in one of a few distinguishable ways:
//!
//! - **`Cancelled`**: the caller asked to stop; the partial graph is still
//!   returned alongside the error.
//! - **`Parse`**: one or more identities failed to parse while running with
//!   [`ErrorPolicy::Abort`](crate::ErrorPolicy::Abort).
//! - **`Graph`** / **`Join`**: internal failures, always a bug or a runtime
//!   shutdown.

use std::fmt;
use tendril_core::GraphError;
use thiserror::Error;

/// A single identity that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub id: String,
    pub message: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

/// Top-level build error.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build cancelled")]
    Cancelled,

    #[error("failed to parse {} file(s): {}", .0.len(), join_failures(.0))]
    Parse(Vec<ParseFailure>),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl BuildError {
    /// True when the build stopped because the caller asked it to.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BuildError::Cancelled)
    }
}

fn join_failures(failures: &[ParseFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
