//! Error types for graph construction and export

use thiserror::Error;

/// Violations of the graph's structural contract.
///
/// These indicate a defect in whoever is feeding the graph and are never
/// swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),
}

/// Failures while producing an export document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("template does not contain the `{0}` placeholder")]
    MissingPlaceholder(&'static str),
}
