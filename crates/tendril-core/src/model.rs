//! Core data structures for the dependency graph

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single node in the dependency graph.
///
/// The `id` is the stable identity of the node (a normalized absolute path for
/// files). The payload is opaque to the graph and never changes after the node
/// has been inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<P> {
    pub id: String,
    pub data: P,
}

impl<P> Node<P> {
    pub fn new(id: impl Into<String>, data: P) -> Self {
        Node { id: id.into(), data }
    }
}

/// Payload carried by every file node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Number of lines in the file.
    pub loc: usize,
    /// Size of the file in bytes.
    pub size: usize,
    /// Name of the package the file belongs to, empty when unknown.
    pub package: String,
    /// Path relative to the analysis root, used for display.
    pub path: String,
}

impl FileInfo {
    /// Build the payload for a file from its contents.
    pub fn from_source(root: &Path, file: &Path, content: &str, package: impl Into<String>) -> Self {
        FileInfo {
            loc: content.lines().count(),
            size: content.len(),
            package: package.into(),
            path: relative_display(root, file),
        }
    }

    /// Package label as shown to users, without a leading `@` scope marker.
    pub fn package_label(&self) -> &str {
        self.package.strip_prefix('@').unwrap_or(&self.package)
    }
}

/// Render `file` relative to `root` with forward slashes.
pub fn relative_display(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
