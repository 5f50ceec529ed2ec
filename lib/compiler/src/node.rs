//! Workflow nodes: configured task instances.
//!
//! A node pairs a task type with per-port input bindings. Everything
//! the compiler needs to know about the node's shape (ports, credits,
//! entry eligibility) comes from the registry descriptor for its task
//! type; the node itself only stores what the author configured.

use crate::task::TaskType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ulid::Ulid;

/// A unique identifier for a node within a workflow.
///
/// Node ids are totally ordered; the planner uses ascending id order as
/// its documented tie-break within a phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(Ulid);

impl NodeId {
    /// Creates a new random node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Creates a node ID from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// The value an author bound to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputBinding {
    /// A literal value typed into the editor.
    Literal {
        /// The literal text.
        value: String,
    },
    /// Marker written by the editor when the port is fed by an edge.
    ///
    /// The marker carries no data; the validator relies on the edge
    /// itself, so a `Connected` binding without a matching edge leaves
    /// the port unsatisfied. If both a literal and an edge are present,
    /// the edge wins at execution time.
    Connected,
}

impl InputBinding {
    /// Returns the literal value, if this binding is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value } => Some(value),
            Self::Connected => None,
        }
    }
}

/// One configured task instance in a workflow graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node within the workflow.
    pub id: NodeId,
    /// The task type this node instantiates.
    pub task: TaskType,
    /// Input bindings keyed by port name.
    #[serde(default)]
    pub inputs: BTreeMap<String, InputBinding>,
}

impl Node {
    /// Creates a new node of the given task type with no bindings.
    #[must_use]
    pub fn new(task: TaskType) -> Self {
        Self {
            id: NodeId::new(),
            task,
            inputs: BTreeMap::new(),
        }
    }

    /// Creates a node with a specific ID.
    #[must_use]
    pub fn with_id(id: NodeId, task: TaskType) -> Self {
        Self {
            id,
            task,
            inputs: BTreeMap::new(),
        }
    }

    /// Binds a literal value to an input port.
    #[must_use]
    pub fn with_input(mut self, port: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(
            port.into(),
            InputBinding::Literal {
                value: value.into(),
            },
        );
        self
    }

    /// Returns the literal bound to a port, if any.
    #[must_use]
    pub fn literal(&self, port: &str) -> Option<&str> {
        self.inputs.get(port).and_then(InputBinding::as_literal)
    }
}
