//! Parser capability consumed by the graph builder

use tendril_core::Node;

/// What a parser learned about one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<P> {
    pub payload: P,
    /// Identities this one directly depends on, in source order.
    pub references: Vec<String>,
}

/// Turns an identity into its payload and direct dependencies.
///
/// `parse` is a blocking call; the builder runs it on a worker thread and
/// never on the coordinating task. `Payload::default()` is used for leaves
/// that were never parsed.
pub trait NodeParser: Send + Sync + 'static {
    type Payload: Default + Send + 'static;

    fn parse(&self, id: &str) -> anyhow::Result<Parsed<Self::Payload>>;

    /// Human readable name for a node, usually a relative path.
    fn display(&self, node: &Node<Self::Payload>) -> String;
}
