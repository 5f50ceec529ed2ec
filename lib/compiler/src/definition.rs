//! Workflow definition types.
//!
//! A definition is the authored source of truth: metadata plus the
//! editable graph. The surrounding system compiles the graph on every
//! save; the definition itself never stores a plan.

use crate::compile::{CompiledWorkflow, compile};
use crate::error::CompileError;
use crate::graph::WorkflowGraph;
use crate::registry::TaskRegistry;
use crate::validate::{ValidationReport, validate};
use chrono::{DateTime, Utc};
use flowcraft_core::WorkflowId;
use serde::{Deserialize, Serialize};

/// Metadata for a workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    /// Human-readable name for this workflow.
    pub name: String,
    /// Description of what this workflow does.
    pub description: Option<String>,
    /// Semantic version of this workflow definition.
    pub version: String,
    /// Whether this workflow is enabled.
    pub enabled: bool,
    /// Tags for organization/filtering.
    pub tags: Vec<String>,
    /// When this workflow was created.
    pub created_at: DateTime<Utc>,
    /// When this workflow was last updated.
    pub updated_at: DateTime<Utc>,
}

impl WorkflowMetadata {
    /// Creates new metadata with default values.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: None,
            version: "0.1.0".to_string(),
            enabled: true,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A complete workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique identifier for this workflow.
    pub id: WorkflowId,
    /// Workflow metadata.
    pub metadata: WorkflowMetadata,
    /// The workflow graph (nodes and edges).
    pub graph: WorkflowGraph,
}

impl Workflow {
    /// Creates a new workflow with an empty graph.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WorkflowId::new(),
            metadata: WorkflowMetadata::new(name),
            graph: WorkflowGraph::new(),
        }
    }

    /// Returns the workflow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Validates the workflow graph, collecting every error.
    #[must_use]
    pub fn validate(&self, registry: &TaskRegistry) -> ValidationReport {
        validate(&self.graph, registry)
    }

    /// Compiles the workflow graph into an execution plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is invalid or planning fails.
    pub fn compile(&self, registry: &TaskRegistry) -> Result<CompiledWorkflow, CompileError> {
        compile(&self.graph, registry)
    }

    /// Marks the workflow as updated (bumps the updated_at timestamp).
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::task::TaskType;

    #[test]
    fn workflow_creation() {
        let workflow = Workflow::new("Price tracker");
        assert_eq!(workflow.name(), "Price tracker");
        assert!(workflow.metadata.enabled);
        assert_eq!(workflow.graph.node_count(), 0);
    }

    #[test]
    fn metadata_builder() {
        let metadata = WorkflowMetadata::new("Scrape docs")
            .with_description("Nightly docs snapshot")
            .with_tag("nightly");

        assert_eq!(metadata.description.as_deref(), Some("Nightly docs snapshot"));
        assert_eq!(metadata.tags, vec!["nightly"]);
    }

    #[test]
    fn touch_bumps_updated_at() {
        let mut workflow = Workflow::new("Test");
        let before = workflow.metadata.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        workflow.touch();
        assert!(workflow.metadata.updated_at > before);
    }

    #[test]
    fn definition_compiles_its_graph() {
        let registry = TaskRegistry::builtin();
        let mut workflow = Workflow::new("Single launch");
        workflow.graph.add_node(
            Node::new(TaskType::LaunchBrowserHeadless)
                .with_input("Website URL", "https://example.com"),
        );

        let compiled = workflow.compile(&registry).expect("compiles");
        assert_eq!(compiled.plan.phases.len(), 1);
        assert_eq!(compiled.credits.total, 5);
    }

    #[test]
    fn workflow_serde_roundtrip() {
        let workflow = Workflow::new("Serialization test");
        let json = serde_json::to_string(&workflow).expect("serialize");
        let mut parsed: Workflow = serde_json::from_str(&json).expect("deserialize");
        parsed.graph.rebuild_index_map();

        assert_eq!(workflow.id, parsed.id);
        assert_eq!(workflow.name(), parsed.name());
    }
}
