//! Core domain types for the flowcraft workflow compiler.
//!
//! This crate provides the strongly-typed identifiers shared across the
//! compiler library and its front ends.

pub mod id;

pub use id::{ExecutionId, ParseIdError, WorkflowId};
