//! Error types for the compiler crate.
//!
//! The validator collects [`ValidationError`]s and returns them all at
//! once; nothing in the validation pass is fatal. The planner and the
//! document codecs return single fatal errors. [`CompileError`] ties the
//! pipeline together for callers of [`crate::compile`].

use crate::edge::EdgeRef;
use crate::node::NodeId;
use crate::task::TaskType;
use std::fmt;

/// A task type with no descriptor in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTaskType {
    /// The unresolved task type.
    pub task: TaskType,
}

impl fmt::Display for UnknownTaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown task type: {}", self.task)
    }
}

impl std::error::Error for UnknownTaskType {}

/// Errors from registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The same task type was registered twice.
    DuplicateTaskType { task: TaskType },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTaskType { task } => {
                write!(f, "duplicate task type in catalog: {task}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors from graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// Node with the given ID was not found in the graph.
    NodeNotFound { node_id: NodeId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// A structural problem found by the validator.
///
/// All variants are user-correctable; the validator reports every
/// problem it finds in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A node's task type does not resolve via the registry.
    UnknownTaskType { node_id: NodeId, task: TaskType },
    /// A required input port is neither literal-bound nor fed by
    /// exactly one type-compatible edge.
    MissingRequiredInput { node_id: NodeId, port: String },
    /// More than one edge feeds the same input port.
    MultipleInboundEdges { node_id: NodeId, port: String },
    /// An edge connects ports of different types, or names a port that
    /// does not exist on its endpoint.
    PortTypeMismatch { edge: EdgeRef },
    /// No node is entry-point eligible with all required inputs
    /// literal-bound.
    NoEntryPoint,
    /// The graph contains a directed cycle through these nodes.
    CyclicDependency { node_ids: Vec<NodeId> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTaskType { node_id, task } => {
                write!(f, "node {node_id} has unknown task type {task}")
            }
            Self::MissingRequiredInput { node_id, port } => {
                write!(f, "required input '{port}' on node {node_id} is not satisfied")
            }
            Self::MultipleInboundEdges { node_id, port } => {
                write!(f, "input '{port}' on node {node_id} has multiple inbound edges")
            }
            Self::PortTypeMismatch { edge } => {
                write!(f, "port type mismatch on edge {edge}")
            }
            Self::NoEntryPoint => {
                write!(f, "workflow has no entry point node")
            }
            Self::CyclicDependency { node_ids } => {
                write!(f, "cyclic dependency between nodes: ")?;
                let mut first = true;
                for id in node_ids {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Fatal errors from the phase planner.
///
/// Unreachable on a graph that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// No progress was possible in a layering pass: the remaining nodes
    /// form or depend on a cycle.
    CycleDetected { node_ids: Vec<NodeId> },
    /// A node's task type has no registry descriptor.
    UnknownTaskType { node_id: NodeId, task: TaskType },
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { node_ids } => {
                write!(f, "planner detected a cycle among {} node(s)", node_ids.len())
            }
            Self::UnknownTaskType { node_id, task } => {
                write!(f, "planner cannot resolve task type {task} for node {node_id}")
            }
        }
    }
}

impl std::error::Error for PlannerError {}

/// Errors from graph and plan document conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Phase numbers must be 1-indexed and contiguous.
    PhaseNumbering { expected: u32, found: u32 },
    /// A node ID appears more than once in the document.
    DuplicateNode { node_id: NodeId },
    /// An edge references a node ID not present in the document.
    DanglingEdge { edge: EdgeRef },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseNumbering { expected, found } => {
                write!(f, "phase numbering broken: expected phase {expected}, found {found}")
            }
            Self::DuplicateNode { node_id } => {
                write!(f, "duplicate node in document: {node_id}")
            }
            Self::DanglingEdge { edge } => {
                write!(f, "edge references missing node: {edge}")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Errors from the full compile pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Validation found structural errors; no plan was produced.
    Invalid { errors: Vec<ValidationError> },
    /// The planner failed on a graph that passed validation.
    Planner(PlannerError),
    /// The estimator could not resolve a task type.
    Estimate(UnknownTaskType),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { errors } => {
                write!(f, "workflow graph is invalid ({} error(s))", errors.len())
            }
            Self::Planner(err) => write!(f, "planning failed: {err}"),
            Self::Estimate(err) => write!(f, "credit estimation failed: {err}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid { .. } => None,
            Self::Planner(err) => Some(err),
            Self::Estimate(err) => Some(err),
        }
    }
}

impl From<PlannerError> for CompileError {
    fn from(err: PlannerError) -> Self {
        Self::Planner(err)
    }
}

impl From<UnknownTaskType> for CompileError {
    fn from(err: UnknownTaskType) -> Self {
        Self::Estimate(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_type_display() {
        let err = UnknownTaskType {
            task: TaskType::NavigateUrl,
        };
        assert_eq!(err.to_string(), "unknown task type: NAVIGATE_URL");
    }

    #[test]
    fn validation_error_display() {
        let node_id = NodeId::new();
        let err = ValidationError::MissingRequiredInput {
            node_id,
            port: "URL".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("required input 'URL'"));
        assert!(display.contains(&node_id.to_string()));
    }

    #[test]
    fn cyclic_dependency_lists_nodes() {
        let a = NodeId::new();
        let b = NodeId::new();
        let err = ValidationError::CyclicDependency {
            node_ids: vec![a, b],
        };
        let display = err.to_string();
        assert!(display.contains(&a.to_string()));
        assert!(display.contains(&b.to_string()));
    }

    #[test]
    fn compile_error_counts_validation_errors() {
        let err = CompileError::Invalid {
            errors: vec![ValidationError::NoEntryPoint],
        };
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn compile_error_exposes_planner_source() {
        use std::error::Error;

        let err = CompileError::from(PlannerError::CycleDetected {
            node_ids: vec![NodeId::new()],
        });
        assert!(err.source().is_some());
    }
}
