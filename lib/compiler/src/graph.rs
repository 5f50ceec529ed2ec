//! Workflow graph storage built on petgraph.
//!
//! The graph is dumb storage: nodes and port-to-port edges. Adding an
//! edge only checks that both endpoint nodes exist; every other
//! structural rule is the validator's job, so the editor can persist a
//! broken graph and get a full error report back instead of being
//! rejected edge by edge.

use crate::edge::{Edge, EdgeRef};
use crate::error::GraphError;
use crate::node::{Node, NodeId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A workflow graph: typed nodes joined by port-to-port edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowGraph {
    /// The underlying directed graph.
    #[serde(with = "graph_serde")]
    graph: DiGraph<Node, Edge>,
    /// Map from NodeId to petgraph's NodeIndex for O(1) lookup.
    #[serde(skip)]
    node_index_map: HashMap<NodeId, NodeIndex>,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index_map: HashMap::new(),
        }
    }

    /// Adds a node to the graph, returning its ID.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let node_id = node.id;
        let index = self.graph.add_node(node);
        self.node_index_map.insert(node_id, index);
        node_id
    }

    /// Removes a node and all edges touching it.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let index = self.node_index_map.remove(&node_id)?;
        let node = self.graph.remove_node(index);
        // petgraph swaps the last node into the removed slot.
        self.rebuild_index_map();
        node
    }

    /// Returns a reference to a node by its ID.
    #[must_use]
    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        let index = self.node_index_map.get(&node_id)?;
        self.graph.node_weight(*index)
    }

    /// Connects a source node's output port to a target node's input port.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint node does not exist. Port
    /// existence, type compatibility, and fan-in limits are checked by
    /// the validator, not here.
    pub fn add_edge(
        &mut self,
        source_id: NodeId,
        target_id: NodeId,
        edge: Edge,
    ) -> Result<(), GraphError> {
        let source_index = self
            .node_index_map
            .get(&source_id)
            .ok_or(GraphError::NodeNotFound { node_id: source_id })?;
        let target_index = self
            .node_index_map
            .get(&target_id)
            .ok_or(GraphError::NodeNotFound { node_id: target_id })?;

        self.graph.add_edge(*source_index, *target_index, edge);
        Ok(())
    }

    /// Returns all nodes in the graph, in storage order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns all nodes sorted ascending by ID.
    #[must_use]
    pub fn nodes_by_id(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.graph.node_weights().collect();
        nodes.sort_by_key(|n| n.id);
        nodes
    }

    /// Returns every edge as a full [`EdgeRef`].
    #[must_use]
    pub fn edge_refs(&self) -> Vec<EdgeRef> {
        self.graph
            .edge_references()
            .filter_map(|e| {
                let source = self.graph.node_weight(e.source())?;
                let target = self.graph.node_weight(e.target())?;
                Some(EdgeRef::new(
                    source.id,
                    e.weight().source_port.clone(),
                    target.id,
                    e.weight().target_port.clone(),
                ))
            })
            .collect()
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the inbound edges of a node, paired with their source node.
    #[must_use]
    pub fn inbound_edges(&self, node_id: NodeId) -> Vec<(&Node, &Edge)> {
        let Some(&index) = self.node_index_map.get(&node_id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(index, Direction::Incoming)
            .filter_map(|edge| {
                let source = self.graph.node_weight(edge.source())?;
                Some((source, edge.weight()))
            })
            .collect()
    }

    /// Returns the IDs of all nodes with an edge into the given node.
    #[must_use]
    pub fn predecessor_ids(&self, node_id: NodeId) -> Vec<NodeId> {
        self.inbound_edges(node_id)
            .into_iter()
            .map(|(source, _)| source.id)
            .collect()
    }

    /// Returns every directed cycle group in the graph.
    ///
    /// Each group is the sorted node-ID membership of a strongly
    /// connected component with more than one node, or a single node
    /// with a self-edge.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<NodeId>> {
        let mut groups = Vec::new();
        for component in petgraph::algo::tarjan_scc(&self.graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| self.graph.find_edge(idx, idx).is_some());
            if !is_cycle {
                continue;
            }
            let mut ids: Vec<NodeId> = component
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).map(|n| n.id))
                .collect();
            ids.sort();
            groups.push(ids);
        }
        groups.sort();
        groups
    }

    /// Rebuilds the node index map after deserialization or removal.
    pub fn rebuild_index_map(&mut self) {
        self.node_index_map.clear();
        for index in self.graph.node_indices() {
            if let Some(node) = self.graph.node_weight(index) {
                self.node_index_map.insert(node.id, index);
            }
        }
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Custom serde for the petgraph DiGraph: a node list plus
/// (source, target, edge) triples keyed by node ID.
mod graph_serde {
    use super::*;
    use petgraph::visit::EdgeRef as _;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeStruct;

    pub fn serialize<S>(graph: &DiGraph<Node, Edge>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let nodes: Vec<_> = graph.node_weights().cloned().collect();
        let edges: Vec<_> = graph
            .edge_references()
            .map(|e| {
                let source_id = graph.node_weight(e.source()).map(|n| n.id);
                let target_id = graph.node_weight(e.target()).map(|n| n.id);
                (source_id, target_id, e.weight().clone())
            })
            .collect();

        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DiGraph<Node, Edge>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        type EdgeTuple = (Option<NodeId>, Option<NodeId>, Edge);

        struct GraphVisitor;

        impl<'de> Visitor<'de> for GraphVisitor {
            type Value = DiGraph<Node, Edge>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a workflow graph with nodes and edges")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut nodes: Option<Vec<Node>> = None;
                let mut edges: Option<Vec<EdgeTuple>> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "nodes" => nodes = Some(map.next_value()?),
                        "edges" => edges = Some(map.next_value()?),
                        _ => {
                            let _ = map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }

                let nodes = nodes.unwrap_or_default();
                let edges = edges.unwrap_or_default();

                let mut graph = DiGraph::new();
                let mut id_to_index = HashMap::new();

                for node in nodes {
                    let id = node.id;
                    let index = graph.add_node(node);
                    id_to_index.insert(id, index);
                }

                for (source_id, target_id, edge) in edges {
                    let (Some(source), Some(target)) = (source_id, target_id) else {
                        continue;
                    };
                    let (Some(&source_idx), Some(&target_idx)) =
                        (id_to_index.get(&source), id_to_index.get(&target))
                    else {
                        continue;
                    };
                    graph.add_edge(source_idx, target_idx, edge);
                }

                Ok(graph)
            }
        }

        deserializer.deserialize_struct("Graph", &["nodes", "edges"], GraphVisitor)
    }
}
