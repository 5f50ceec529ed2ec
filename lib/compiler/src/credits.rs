//! Credit estimation for execution plans.
//!
//! Credits are the billing unit consumed per node execution. The
//! estimate is a pure fold over the plan: per-phase sums plus a total.

use crate::error::UnknownTaskType;
use crate::plan::ExecutionPlan;
use crate::registry::TaskRegistry;
use serde::{Deserialize, Serialize};

/// Credit cost of a plan, per phase and in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEstimate {
    /// Credit sum for each phase, in phase order.
    pub per_phase: Vec<u32>,
    /// Total credits across all phases.
    pub total: u32,
}

/// Sums the per-node credit costs of a plan.
///
/// # Errors
///
/// Returns an error if a node's task type has no registry descriptor.
pub fn estimate(
    plan: &ExecutionPlan,
    registry: &TaskRegistry,
) -> Result<CreditEstimate, UnknownTaskType> {
    let mut per_phase = Vec::with_capacity(plan.phases.len());
    let mut total = 0u32;

    for phase in &plan.phases {
        let mut sum = 0u32;
        for node in &phase.nodes {
            sum += registry.lookup(node.task)?.credits;
        }
        per_phase.push(sum);
        total += sum;
    }

    Ok(CreditEstimate { per_phase, total })
}
