//! Command implementations.
//!
//! Each command reads its inputs, drives the compiler, and returns the
//! rendered output as a string so the commands stay testable without
//! capturing stdout.

use anyhow::{Context, Result};
use flowcraft_compiler::{
    CatalogDocument, Envelope, GraphDocument, TaskRegistry, WorkflowGraph, compile, validate,
};
use serde::Serialize;
use std::path::Path;

/// Result of validating a graph: the rendered report plus whether the
/// graph passed, so the caller can pick an exit code.
pub struct ValidateOutput {
    pub rendered: String,
    pub is_valid: bool,
}

/// Loads the task registry, from a catalog file when one is given.
pub fn load_registry(catalog_path: Option<&Path>) -> Result<TaskRegistry> {
    match catalog_path {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
            let catalog: CatalogDocument = serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse catalog file: {}", path.display()))?;
            let registry = TaskRegistry::from_catalog(catalog)
                .with_context(|| format!("invalid catalog: {}", path.display()))?;
            tracing::debug!(path = %path.display(), tasks = registry.len(), "loaded catalog");
            Ok(registry)
        }
        None => Ok(TaskRegistry::builtin()),
    }
}

/// Reads a graph document envelope from a file.
pub fn load_graph(path: &Path) -> Result<WorkflowGraph> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read graph file: {}", path.display()))?;
    let envelope: Envelope<GraphDocument> = Envelope::from_json_bytes(&bytes)
        .with_context(|| format!("failed to parse graph file: {}", path.display()))?;
    if !envelope.is_current_version() {
        tracing::warn!(
            version = envelope.version,
            "graph document uses a non-current envelope version"
        );
    }
    envelope
        .into_payload()
        .into_graph()
        .with_context(|| format!("malformed graph document: {}", path.display()))
}

/// Validates a graph and renders the full error report.
pub fn run_validate(
    graph_path: &Path,
    registry: &TaskRegistry,
    pretty: bool,
) -> Result<ValidateOutput> {
    let graph = load_graph(graph_path)?;
    let report = validate(&graph, registry);

    #[derive(Serialize)]
    struct Report {
        valid: bool,
        errors: Vec<String>,
    }

    let is_valid = report.is_valid();
    let rendered = to_json(
        &Report {
            valid: is_valid,
            errors: report.errors().iter().map(ToString::to_string).collect(),
        },
        pretty,
    )?;
    Ok(ValidateOutput { rendered, is_valid })
}

/// Compiles a graph into a versioned plan document.
pub fn run_compile(graph_path: &Path, registry: &TaskRegistry, pretty: bool) -> Result<String> {
    let graph = load_graph(graph_path)?;
    let compiled = compile(&graph, registry)?;
    tracing::info!(
        phases = compiled.plan.phases.len(),
        credits = compiled.credits.total,
        "compiled workflow"
    );
    to_json(&Envelope::new(compiled.to_document()), pretty)
}

/// Compiles a graph and renders only its credit estimate.
pub fn run_estimate(graph_path: &Path, registry: &TaskRegistry, pretty: bool) -> Result<String> {
    let graph = load_graph(graph_path)?;
    let compiled = compile(&graph, registry)?;
    to_json(&compiled.credits, pretty)
}

/// Renders the task catalog the registry was built from.
pub fn run_tasks(registry: &TaskRegistry, pretty: bool) -> Result<String> {
    to_json(&registry.to_catalog(), pretty)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.context("failed to render output as JSON")
}
