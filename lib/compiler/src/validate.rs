//! Structural validation of workflow graphs.
//!
//! Validation never fails fast: every rule is checked against every
//! node and edge so the editor can surface the complete problem list in
//! one round trip. The rules, in order:
//!
//! 1. every node's task type resolves via the registry
//! 2. every required input is literal-bound or fed by one matching edge
//! 3. at most one inbound edge per input port
//! 4. edge endpoint ports exist and carry equal types
//! 5. at least one entry-point node with all required inputs literal
//! 6. the graph is acyclic

use crate::edge::EdgeRef;
use crate::error::ValidationError;
use crate::graph::WorkflowGraph;
use crate::node::Node;
use crate::registry::TaskRegistry;
use crate::task::TaskDescriptor;
use std::collections::HashMap;

/// The outcome of validating a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the collected errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the report, returning the collected errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Validates a graph against the registry, collecting every error.
#[must_use]
pub fn validate(graph: &WorkflowGraph, registry: &TaskRegistry) -> ValidationReport {
    let mut errors = Vec::new();
    let nodes = graph.nodes_by_id();

    for node in &nodes {
        check_node(graph, registry, node, &mut errors);
    }

    if !has_entry_point(graph, registry, &nodes) {
        errors.push(ValidationError::NoEntryPoint);
    }

    for node_ids in graph.cycles() {
        errors.push(ValidationError::CyclicDependency { node_ids });
    }

    ValidationReport { errors }
}

/// Checks the port-level rules for one node.
fn check_node(
    graph: &WorkflowGraph,
    registry: &TaskRegistry,
    node: &Node,
    errors: &mut Vec<ValidationError>,
) {
    let Ok(descriptor) = registry.lookup(node.task) else {
        errors.push(ValidationError::UnknownTaskType {
            node_id: node.id,
            task: node.task,
        });
        return;
    };

    // Group inbound edges by target port.
    let mut inbound: HashMap<&str, Vec<(&Node, &crate::edge::Edge)>> = HashMap::new();
    for (source, edge) in graph.inbound_edges(node.id) {
        inbound.entry(edge.target_port.as_str()).or_default().push((source, edge));
    }

    let mut ports: Vec<&&str> = inbound.keys().collect();
    ports.sort();
    for port in ports {
        let feeds = &inbound[*port];
        if feeds.len() > 1 {
            errors.push(ValidationError::MultipleInboundEdges {
                node_id: node.id,
                port: (*port).to_string(),
            });
        }
        for (source, edge) in feeds {
            if !edge_types_match(registry, source, descriptor, edge) {
                errors.push(ValidationError::PortTypeMismatch {
                    edge: EdgeRef::new(
                        source.id,
                        edge.source_port.clone(),
                        node.id,
                        edge.target_port.clone(),
                    ),
                });
            }
        }
    }

    for input in descriptor.required_inputs() {
        if node.literal(&input.name).is_some() {
            continue;
        }
        let satisfied = inbound
            .get(input.name.as_str())
            .is_some_and(|feeds| {
                feeds.len() == 1
                    && feeds
                        .iter()
                        .all(|(source, edge)| edge_types_match(registry, source, descriptor, edge))
            });
        if !satisfied {
            errors.push(ValidationError::MissingRequiredInput {
                node_id: node.id,
                port: input.name.clone(),
            });
        }
    }
}

/// Returns true if the edge joins an existing output port to an
/// existing input port of the same type.
///
/// Edges touching a node with an unresolved task type are skipped (the
/// unknown-type error already covers them), so this returns true.
fn edge_types_match(
    registry: &TaskRegistry,
    source: &Node,
    target_descriptor: &TaskDescriptor,
    edge: &crate::edge::Edge,
) -> bool {
    let Ok(source_descriptor) = registry.lookup(source.task) else {
        return true;
    };
    let (Some(out_port), Some(in_port)) = (
        source_descriptor.output_port(&edge.source_port),
        target_descriptor.input_port(&edge.target_port),
    ) else {
        return false;
    };
    out_port.port_type == in_port.port_type
}

/// Returns true if some node can start the workflow: entry-point
/// eligible, every required input literal-bound, and no inbound edge
/// into a required input.
fn has_entry_point(graph: &WorkflowGraph, registry: &TaskRegistry, nodes: &[&Node]) -> bool {
    nodes.iter().any(|node| {
        let Ok(descriptor) = registry.lookup(node.task) else {
            return false;
        };
        if !descriptor.is_entry_point {
            return false;
        }
        let all_literal = descriptor
            .required_inputs()
            .all(|input| node.literal(&input.name).is_some());
        let no_required_inbound = graph.inbound_edges(node.id).iter().all(|(_, edge)| {
            descriptor
                .input_port(&edge.target_port)
                .is_none_or(|port| !port.required)
        });
        all_literal && no_required_inbound
    })
}
