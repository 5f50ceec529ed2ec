//! Wire formats for graphs and plans.
//!
//! Two documents cross the process boundary: the authoring tool submits
//! a [`GraphDocument`] on save/execute, and the compiler hands the
//! executor a [`PlanDocument`]. Both are plain JSON-compatible structures
//! with deterministic ordering so diffs stay readable. Payloads are
//! wrapped in a versioned [`Envelope`] for transmission.

use crate::edge::EdgeRef;
use crate::error::DocumentError;
use crate::graph::WorkflowGraph;
use crate::node::{InputBinding, Node, NodeId};
use crate::plan::{ExecutionPlan, ExecutionPlanPhase};
use crate::task::TaskType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The current envelope version.
pub const CURRENT_VERSION: u32 = 1;

/// A versioned envelope wrapping a wire payload.
///
/// Everything transmitted to the executor or persisted alongside a
/// workflow definition is wrapped in an envelope so the format can
/// evolve without breaking readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The version of the envelope format.
    pub version: u32,
    /// The wrapped payload.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Creates a new envelope with the current version.
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self {
            version: CURRENT_VERSION,
            payload,
        }
    }

    /// Unwraps the envelope, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Returns true if this envelope uses the current version.
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.version == CURRENT_VERSION
    }
}

impl<T: Serialize> Envelope<T> {
    /// Serializes the envelope to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl<T: for<'de> Deserialize<'de>> Envelope<T> {
    /// Deserializes an envelope from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// One node as it appears in a plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    /// The node's ID.
    pub id: NodeId,
    /// The node's task type.
    pub task: TaskType,
    /// Literal input bindings the executor needs.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, InputBinding>,
}

/// One phase as it appears in a plan document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDocument {
    /// 1-indexed phase number.
    pub phase: u32,
    /// The phase's nodes, ascending by ID.
    pub nodes: Vec<PlanNode>,
}

/// The wire format of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDocument {
    /// The phases, in execution order.
    pub phases: Vec<PhaseDocument>,
}

impl PlanDocument {
    /// Converts a plan into its wire form.
    #[must_use]
    pub fn from_plan(plan: &ExecutionPlan) -> Self {
        let phases = plan
            .phases
            .iter()
            .map(|phase| PhaseDocument {
                phase: phase.phase,
                nodes: phase
                    .nodes
                    .iter()
                    .map(|node| PlanNode {
                        id: node.id,
                        task: node.task,
                        inputs: node.inputs.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { phases }
    }

    /// Rebuilds the plan this document was serialized from.
    ///
    /// This is the left inverse of [`PlanDocument::from_plan`]:
    /// `doc.into_plan()` returns the original plan for every plan the
    /// compiler produces.
    ///
    /// # Errors
    ///
    /// Returns an error if phase numbers are not 1-indexed and
    /// contiguous, or if a node ID appears twice.
    pub fn into_plan(self) -> Result<ExecutionPlan, DocumentError> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut phases = Vec::with_capacity(self.phases.len());

        for (i, phase) in self.phases.into_iter().enumerate() {
            let expected = (i + 1) as u32;
            if phase.phase != expected {
                return Err(DocumentError::PhaseNumbering {
                    expected,
                    found: phase.phase,
                });
            }
            let mut nodes = Vec::with_capacity(phase.nodes.len());
            for plan_node in phase.nodes {
                if !seen.insert(plan_node.id) {
                    return Err(DocumentError::DuplicateNode {
                        node_id: plan_node.id,
                    });
                }
                nodes.push(Node {
                    id: plan_node.id,
                    task: plan_node.task,
                    inputs: plan_node.inputs,
                });
            }
            phases.push(ExecutionPlanPhase {
                phase: expected,
                nodes,
            });
        }

        Ok(ExecutionPlan { phases })
    }
}

/// The authoring wire format: node list plus full edge references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// The graph's nodes.
    pub nodes: Vec<Node>,
    /// The graph's edges.
    #[serde(default)]
    pub edges: Vec<EdgeRef>,
}

impl GraphDocument {
    /// Converts a graph into its wire form, deterministically ordered.
    #[must_use]
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        let nodes = graph.nodes_by_id().into_iter().cloned().collect();
        let mut edges = graph.edge_refs();
        edges.sort();
        Self { nodes, edges }
    }

    /// Builds a graph from the document.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate node IDs or edges referencing
    /// nodes not present in the document.
    pub fn into_graph(self) -> Result<WorkflowGraph, DocumentError> {
        let mut graph = WorkflowGraph::new();
        let mut ids: HashSet<NodeId> = HashSet::new();

        for node in self.nodes {
            if !ids.insert(node.id) {
                return Err(DocumentError::DuplicateNode { node_id: node.id });
            }
            graph.add_node(node);
        }

        for edge_ref in self.edges {
            // Membership is checked by add_edge itself.
            graph
                .add_edge(edge_ref.source_node, edge_ref.target_node, edge_ref.to_edge())
                .map_err(|_| DocumentError::DanglingEdge { edge: edge_ref.clone() })?;
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::edge::Edge;
    use crate::registry::TaskRegistry;

    fn two_node_plan() -> ExecutionPlan {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(
            Node::new(TaskType::LaunchBrowserHeadless)
                .with_input("Website URL", "https://example.com"),
        );
        let b = graph.add_node(
            Node::new(TaskType::NavigateUrl).with_input("URL", "https://example.com/next"),
        );
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();
        compile(&graph, &registry).expect("compiles").plan
    }

    #[test]
    fn plan_document_roundtrip() {
        let plan = two_node_plan();
        let doc = PlanDocument::from_plan(&plan);
        let rebuilt = doc.into_plan().expect("roundtrip");
        assert_eq!(plan, rebuilt);
    }

    #[test]
    fn plan_document_json_is_stable() {
        let plan = two_node_plan();
        let doc = PlanDocument::from_plan(&plan);
        let first = serde_json::to_string(&doc).expect("serialize");
        let second = serde_json::to_string(&PlanDocument::from_plan(&plan)).expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn bad_phase_numbering_rejected() {
        let plan = two_node_plan();
        let mut doc = PlanDocument::from_plan(&plan);
        doc.phases[1].phase = 7;

        let err = doc.into_plan().unwrap_err();
        assert_eq!(err, DocumentError::PhaseNumbering { expected: 2, found: 7 });
    }

    #[test]
    fn duplicate_node_in_plan_rejected() {
        let plan = two_node_plan();
        let mut doc = PlanDocument::from_plan(&plan);
        let duplicated = doc.phases[0].nodes[0].clone();
        doc.phases[1].nodes.push(duplicated.clone());

        let err = doc.into_plan().unwrap_err();
        assert_eq!(err, DocumentError::DuplicateNode { node_id: duplicated.id });
    }

    #[test]
    fn graph_document_roundtrip() {
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(
            Node::new(TaskType::LaunchBrowserHeadless)
                .with_input("Website URL", "https://example.com"),
        );
        let b = graph.add_node(
            Node::new(TaskType::NavigateUrl).with_input("URL", "https://example.com/next"),
        );
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();

        let doc = GraphDocument::from_graph(&graph);
        let rebuilt = doc.into_graph().expect("roundtrip");
        assert_eq!(rebuilt.node_count(), 2);
        assert_eq!(rebuilt.edge_count(), 1);
        assert_eq!(rebuilt.inbound_edges(b).len(), 1);
    }

    #[test]
    fn dangling_edge_rejected() {
        let node = Node::new(TaskType::LaunchBrowserHeadless);
        let ghost = NodeId::new();
        let doc = GraphDocument {
            edges: vec![EdgeRef::new(node.id, "Web page", ghost, "Web page")],
            nodes: vec![node],
        };

        let err = doc.into_graph().unwrap_err();
        assert!(matches!(err, DocumentError::DanglingEdge { .. }));
    }

    #[test]
    fn duplicate_node_in_graph_document_rejected() {
        let node = Node::new(TaskType::LaunchBrowserHeadless);
        let doc = GraphDocument {
            nodes: vec![node.clone(), node.clone()],
            edges: vec![],
        };

        let err = doc.into_graph().unwrap_err();
        assert_eq!(err, DocumentError::DuplicateNode { node_id: node.id });
    }

    #[test]
    fn envelope_roundtrip() {
        let plan = two_node_plan();
        let envelope = Envelope::new(PlanDocument::from_plan(&plan));
        assert!(envelope.is_current_version());

        let bytes = envelope.to_json_bytes().expect("serialize");
        let parsed: Envelope<PlanDocument> =
            Envelope::from_json_bytes(&bytes).expect("deserialize");
        assert_eq!(envelope, parsed);
    }
}
