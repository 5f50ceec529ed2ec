//! The compile pipeline: validate, plan, estimate.
//!
//! Compilation is a pure function of the graph and the registry; a new
//! compile happens on every save, and the result is immutable once
//! persisted for an execution run.

use crate::credits::{CreditEstimate, estimate};
use crate::document::PlanDocument;
use crate::error::CompileError;
use crate::graph::WorkflowGraph;
use crate::plan::{ExecutionPlan, plan};
use crate::registry::TaskRegistry;
use crate::validate::validate;

/// The result of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledWorkflow {
    /// The ordered phase plan.
    pub plan: ExecutionPlan,
    /// Credit cost of the plan.
    pub credits: CreditEstimate,
}

impl CompiledWorkflow {
    /// Converts the compiled plan into its wire document.
    #[must_use]
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument::from_plan(&self.plan)
    }
}

/// Compiles a workflow graph into an execution plan.
///
/// # Errors
///
/// Returns every validation error at once if the graph is structurally
/// invalid, or a single fatal error if planning or estimation fails on
/// a graph that passed validation.
pub fn compile(
    graph: &WorkflowGraph,
    registry: &TaskRegistry,
) -> Result<CompiledWorkflow, CompileError> {
    let report = validate(graph, registry);
    if !report.is_valid() {
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            errors = report.errors().len(),
            "workflow graph failed validation"
        );
        return Err(CompileError::Invalid {
            errors: report.into_errors(),
        });
    }

    let plan = plan(graph, registry)?;
    let credits = estimate(&plan, registry)?;

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        phases = plan.phases.len(),
        total_credits = credits.total,
        "workflow graph compiled"
    );

    Ok(CompiledWorkflow { plan, credits })
}
