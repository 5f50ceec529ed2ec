//! Workflow compiler for the flowcraft platform.
//!
//! This crate turns a directed graph of typed web-automation tasks into
//! an ordered execution plan:
//!
//! - **Task Registry**: static catalog of task descriptors with typed
//!   input/output ports, entry-point eligibility, and credit costs
//! - **Graph Model**: directed graphs using petgraph with typed nodes
//!   and port-to-port edges
//! - **Validator**: collects every structural error in one pass
//! - **Phase Planner**: Kahn-style topological layering into 1-indexed
//!   phases with a deterministic node order
//! - **Credit Estimator**: per-phase and total cost of a plan
//! - **Documents**: stable JSON wire formats for graphs and plans
//!
//! Execution itself is out of scope: the plan document is handed to an
//! external executor, which reports back via the status types in
//! [`execution`].

pub mod compile;
pub mod credits;
pub mod definition;
pub mod document;
pub mod edge;
pub mod error;
pub mod execution;
pub mod graph;
pub mod node;
pub mod plan;
pub mod registry;
pub mod task;
pub mod validate;

pub use compile::{CompiledWorkflow, compile};
pub use credits::{CreditEstimate, estimate};
pub use definition::{Workflow, WorkflowMetadata};
pub use document::{Envelope, GraphDocument, PhaseDocument, PlanDocument, PlanNode};
pub use edge::{Edge, EdgeRef};
pub use error::{
    CompileError, DocumentError, GraphError, PlannerError, RegistryError, UnknownTaskType,
    ValidationError,
};
pub use execution::{ExecutionSnapshot, ExecutionStatus, PhaseStatus};
pub use graph::WorkflowGraph;
pub use node::{InputBinding, Node, NodeId};
pub use plan::{ExecutionPlan, ExecutionPlanPhase, plan};
pub use registry::{CatalogDocument, TaskRegistry};
pub use task::{PortSpec, PortType, TaskDescriptor, TaskType};
pub use validate::{ValidationReport, validate};
