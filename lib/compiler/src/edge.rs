//! Edge types for workflow graphs.
//!
//! An edge carries data from a source node's output port to a target
//! node's input port. Outputs may fan out to any number of edges; an
//! input port accepts at most one inbound edge.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An edge between two ports, stored as the graph's edge weight.
///
/// The endpoint nodes are implied by the graph structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The name of the output port on the source node.
    pub source_port: String,
    /// The name of the input port on the target node.
    pub target_port: String,
}

impl Edge {
    /// Creates a new edge between ports.
    #[must_use]
    pub fn new(source_port: impl Into<String>, target_port: impl Into<String>) -> Self {
        Self {
            source_port: source_port.into(),
            target_port: target_port.into(),
        }
    }
}

/// A complete edge reference including both node IDs.
///
/// This is the document form of an edge, and what error messages cite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeRef {
    /// The source node ID.
    pub source_node: NodeId,
    /// The source output port name.
    pub source_port: String,
    /// The target node ID.
    pub target_node: NodeId,
    /// The target input port name.
    pub target_port: String,
}

impl EdgeRef {
    /// Creates a new edge reference.
    #[must_use]
    pub fn new(
        source_node: NodeId,
        source_port: impl Into<String>,
        target_node: NodeId,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source_node,
            source_port: source_port.into(),
            target_node,
            target_port: target_port.into(),
        }
    }

    /// Splits the reference into its edge weight.
    #[must_use]
    pub fn to_edge(&self) -> Edge {
        Edge::new(self.source_port.clone(), self.target_port.clone())
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.source_node, self.source_port, self.target_node, self.target_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_creation() {
        let edge = Edge::new("Web page", "Web page");
        assert_eq!(edge.source_port, "Web page");
        assert_eq!(edge.target_port, "Web page");
    }

    #[test]
    fn edge_ref_display_names_both_ports() {
        let edge_ref = EdgeRef::new(NodeId::new(), "Html", NodeId::new(), "Content");
        let display = edge_ref.to_string();
        assert!(display.contains(":Html ->"));
        assert!(display.ends_with(":Content"));
    }

    #[test]
    fn edge_ref_to_edge() {
        let edge_ref = EdgeRef::new(NodeId::new(), "out", NodeId::new(), "in");
        let edge = edge_ref.to_edge();
        assert_eq!(edge.source_port, "out");
        assert_eq!(edge.target_port, "in");
    }

    #[test]
    fn edge_serde_roundtrip() {
        let edge = Edge::new("Extracted text", "Body");
        let json = serde_json::to_string(&edge).expect("serialize");
        let parsed: Edge = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(edge, parsed);
    }
}
