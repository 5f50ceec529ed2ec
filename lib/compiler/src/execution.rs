//! Execution status reporting types.
//!
//! The compiler does not run workflows; these types are the wire
//! contract an executor fills in as it walks a plan phase by phase.

use chrono::{DateTime, Utc};
use flowcraft_core::{ExecutionId, WorkflowId};
use serde::{Deserialize, Serialize};

/// Status of a phase or an overall execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// Not yet started.
    Pending,
    /// Currently running.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl ExecutionStatus {
    /// Returns true when no further transitions are possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// Per-phase progress within an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatus {
    /// 1-indexed phase number, matching the plan document.
    pub phase: u32,
    /// Current status of this phase.
    pub status: ExecutionStatus,
    /// Credits actually consumed by this phase so far.
    pub credits_consumed: u32,
}

impl PhaseStatus {
    /// Creates a pending status record for a phase.
    #[must_use]
    pub fn pending(phase: u32) -> Self {
        Self {
            phase,
            status: ExecutionStatus::Pending,
            credits_consumed: 0,
        }
    }
}

/// A point-in-time view of one workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    /// Unique identifier for this execution.
    pub execution_id: ExecutionId,
    /// The workflow being executed.
    pub workflow_id: WorkflowId,
    /// Per-phase progress, ordered by phase number.
    pub phases: Vec<PhaseStatus>,
    /// When the execution started, if it has.
    pub started_at: Option<DateTime<Utc>>,
    /// When the execution reached a terminal status, if it has.
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionSnapshot {
    /// Creates a snapshot with every phase pending.
    #[must_use]
    pub fn pending(workflow_id: WorkflowId, phase_count: u32) -> Self {
        Self {
            execution_id: ExecutionId::new(),
            workflow_id,
            phases: (1..=phase_count).map(PhaseStatus::pending).collect(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Derives the overall status from the per-phase statuses.
    ///
    /// Any failed phase fails the execution; otherwise any running
    /// phase keeps it running; an execution with every phase
    /// completed is completed; anything else is still pending.
    #[must_use]
    pub fn overall(&self) -> ExecutionStatus {
        if self.phases.iter().any(|p| p.status == ExecutionStatus::Failed) {
            return ExecutionStatus::Failed;
        }
        if self.phases.iter().any(|p| p.status == ExecutionStatus::Running) {
            return ExecutionStatus::Running;
        }
        if !self.phases.is_empty()
            && self
                .phases
                .iter()
                .all(|p| p.status == ExecutionStatus::Completed)
        {
            return ExecutionStatus::Completed;
        }
        ExecutionStatus::Pending
    }

    /// Total credits consumed across all phases so far.
    #[must_use]
    pub fn credits_consumed(&self) -> u32 {
        self.phases.iter().map(|p| p.credits_consumed).sum()
    }
}
