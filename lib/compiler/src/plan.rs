//! Phase planning: Kahn-style topological layering.
//!
//! Phase 1 holds the entry-point nodes. Every later phase holds the
//! not-yet-placed nodes whose inbound edges all originate from earlier
//! phases. Within a phase, nodes are ordered ascending by node ID; this
//! tie-break is part of the contract so plans are deterministic and
//! diff-friendly. Phase numbers are 1-indexed and contiguous.

use crate::error::PlannerError;
use crate::graph::WorkflowGraph;
use crate::node::{Node, NodeId};
use crate::registry::TaskRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One batch of nodes whose dependencies are satisfied by earlier phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlanPhase {
    /// 1-indexed phase number.
    pub phase: u32,
    /// The nodes in this phase, ascending by ID.
    pub nodes: Vec<Node>,
}

/// The ordered phase list derived from a validated graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// The phases, in execution order.
    pub phases: Vec<ExecutionPlanPhase>,
}

impl ExecutionPlan {
    /// Returns the phase number a node was placed in, if any.
    #[must_use]
    pub fn phase_of(&self, node_id: NodeId) -> Option<u32> {
        self.phases
            .iter()
            .find(|p| p.nodes.iter().any(|n| n.id == node_id))
            .map(|p| p.phase)
    }

    /// Returns the total number of nodes across all phases.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.phases.iter().map(|p| p.nodes.len()).sum()
    }

    /// Returns true if the plan has no phases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// Plans a validated graph into ordered execution phases.
///
/// # Errors
///
/// Returns an error if a task type cannot be resolved, or if a layering
/// pass makes no progress (a cycle reached the planner). Both cases are
/// already rejected by the validator on a validated graph.
pub fn plan(graph: &WorkflowGraph, registry: &TaskRegistry) -> Result<ExecutionPlan, PlannerError> {
    let nodes = graph.nodes_by_id();
    if nodes.is_empty() {
        return Ok(ExecutionPlan::default());
    }

    for node in &nodes {
        if !registry.contains(node.task) {
            return Err(PlannerError::UnknownTaskType {
                node_id: node.id,
                task: node.task,
            });
        }
    }

    let mut placed: HashSet<NodeId> = HashSet::new();
    let mut phases: Vec<ExecutionPlanPhase> = Vec::new();
    let mut phase_number: u32 = 0;

    // Phase 1: entry-point nodes with no inbound edges.
    let first: Vec<&Node> = nodes
        .iter()
        .copied()
        .filter(|node| {
            let descriptor = registry
                .lookup(node.task)
                .expect("task types checked above");
            descriptor.is_entry_point && graph.inbound_edges(node.id).is_empty()
        })
        .collect();

    let mut current = first;
    loop {
        if current.is_empty() {
            let mut remaining: Vec<NodeId> = nodes
                .iter()
                .filter(|n| !placed.contains(&n.id))
                .map(|n| n.id)
                .collect();
            remaining.sort();
            return Err(PlannerError::CycleDetected { node_ids: remaining });
        }

        for node in &current {
            placed.insert(node.id);
        }
        phase_number += 1;
        phases.push(ExecutionPlanPhase {
            phase: phase_number,
            nodes: current.iter().map(|n| (*n).clone()).collect(),
        });

        if placed.len() == nodes.len() {
            break;
        }

        // Next phase: unplaced nodes whose inbound edges all come from
        // placed nodes. `nodes` is id-sorted, so phases inherit the order.
        current = nodes
            .iter()
            .copied()
            .filter(|node| {
                !placed.contains(&node.id)
                    && graph
                        .predecessor_ids(node.id)
                        .iter()
                        .all(|pred| placed.contains(pred))
            })
            .collect();
    }

    Ok(ExecutionPlan { phases })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::task::TaskType;

    fn launch() -> Node {
        Node::new(TaskType::LaunchBrowserHeadless).with_input("Website URL", "https://example.com")
    }

    fn click(selector: &str) -> Node {
        Node::new(TaskType::ClickElement).with_input("Selector", selector)
    }

    #[test]
    fn empty_graph_plans_to_empty() {
        let registry = TaskRegistry::builtin();
        let graph = WorkflowGraph::new();
        let plan = plan(&graph, &registry).expect("plan");
        assert!(plan.is_empty());
    }

    #[test]
    fn linear_chain_gets_one_node_per_phase() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(launch());
        let b = graph.add_node(click("#b"));
        let c = graph.add_node(click("#c"));
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();
        graph.add_edge(b, c, Edge::new("Web page", "Web page")).unwrap();

        let plan = plan(&graph, &registry).expect("plan");
        assert_eq!(plan.phases.len(), 3);
        assert_eq!(plan.phase_of(a), Some(1));
        assert_eq!(plan.phase_of(b), Some(2));
        assert_eq!(plan.phase_of(c), Some(3));
    }

    #[test]
    fn every_edge_crosses_phases_forward() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        // Diamond: launch -> (fill, click) -> wait.
        let a = graph.add_node(launch());
        let f = graph.add_node(
            Node::new(TaskType::FillInput)
                .with_input("Selector", "#q")
                .with_input("Value", "rust"),
        );
        let c = graph.add_node(click("#go"));
        let w = graph.add_node(
            Node::new(TaskType::WaitForElement)
                .with_input("Selector", "#results")
                .with_input("Visibility", "visible"),
        );
        graph.add_edge(a, f, Edge::new("Web page", "Web page")).unwrap();
        graph.add_edge(a, c, Edge::new("Web page", "Web page")).unwrap();
        graph.add_edge(c, w, Edge::new("Web page", "Web page")).unwrap();

        let plan = plan(&graph, &registry).expect("plan");
        assert_eq!(plan.node_count(), 4);
        for edge in graph.edge_refs() {
            let from = plan.phase_of(edge.source_node).expect("placed");
            let to = plan.phase_of(edge.target_node).expect("placed");
            assert!(from < to, "edge {edge} does not cross phases forward");
        }
    }

    #[test]
    fn parallel_branches_share_a_phase_sorted_by_id() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(launch());
        let b = graph.add_node(click("#b"));
        let c = graph.add_node(click("#c"));
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();
        graph.add_edge(a, c, Edge::new("Web page", "Web page")).unwrap();

        let plan = plan(&graph, &registry).expect("plan");
        assert_eq!(plan.phases.len(), 2);
        let second = &plan.phases[1];
        assert_eq!(second.phase, 2);
        let ids: Vec<NodeId> = second.nodes.iter().map(|n| n.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn each_node_placed_exactly_once() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(launch());
        let b = graph.add_node(click("#b"));
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();

        let plan = plan(&graph, &registry).expect("plan");
        let mut seen = HashSet::new();
        for phase in &plan.phases {
            for node in &phase.nodes {
                assert!(seen.insert(node.id), "node placed twice: {}", node.id);
            }
        }
        assert_eq!(seen.len(), graph.node_count());
    }

    #[test]
    fn phase_numbers_are_contiguous_from_one() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node(launch());
        let b = graph.add_node(click("#b"));
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();

        let plan = plan(&graph, &registry).expect("plan");
        for (i, phase) in plan.phases.iter().enumerate() {
            assert_eq!(phase.phase, u32::try_from(i).unwrap() + 1);
            assert!(!phase.nodes.is_empty());
        }
    }

    #[test]
    fn cycle_reaching_planner_is_fatal() {
        let registry = TaskRegistry::builtin();
        let mut graph = WorkflowGraph::new();
        graph.add_node(launch());
        let a = graph.add_node(click("#a"));
        let b = graph.add_node(click("#b"));
        graph.add_edge(a, b, Edge::new("Web page", "Web page")).unwrap();
        graph.add_edge(b, a, Edge::new("Web page", "Web page")).unwrap();

        let err = plan(&graph, &registry).unwrap_err();
        match err {
            PlannerError::CycleDetected { node_ids } => {
                assert!(node_ids.contains(&a));
                assert!(node_ids.contains(&b));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_task_is_fatal_to_the_planner() {
        let builtin = TaskRegistry::builtin();
        let click_only = TaskRegistry::from_descriptors([builtin
            .lookup(TaskType::ClickElement)
            .expect("known")
            .clone()])
        .expect("no duplicates");

        let mut graph = WorkflowGraph::new();
        let id = graph.add_node(launch());

        let err = plan(&graph, &click_only).unwrap_err();
        assert_eq!(
            err,
            PlannerError::UnknownTaskType {
                node_id: id,
                task: TaskType::LaunchBrowserHeadless,
            }
        );
    }
}
