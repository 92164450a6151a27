//! Implementation of the phases of a clone run.
//!
//! ## Overview
//!
//! A clone follows 5 phases:
//! 1. Validation - Check names and that every input file exists
//! 2. Stale Target Removal - Delete what an earlier run left for the target
//! 3. Rewriting - Rename and re-identify the definition and auxiliary files
//! 4. Registry Updates - Replace the target's records in both registries
//! 5. Persisting - Stage every output and move it into place
//!
//! Phases 3 and 4 work on in-memory documents only. The rewriting logic for
//! definitions lives in [`crate::rewrite`] and the registry updaters in
//! [`crate::registry`]; the orchestrator calls them directly.

pub mod auxiliary;
pub mod cleanup;
pub mod orchestrator;
pub mod persist;
pub mod validate;

pub use orchestrator::{execute_clone, CloneReport};
