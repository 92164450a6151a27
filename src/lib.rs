//! # Catalog Clone Library
//!
//! This library copies a catalog inside a 1C:Enterprise XML configuration
//! dump under a new name. The copy is a separate entity: it has its own
//! identifiers, its references point at itself, and both registries of the
//! configuration list it next to the other catalogs.
//!
//! ## Quick Example
//!
//! ```no_run
//! use catalog_clone::config::CloneRequest;
//! use catalog_clone::ident::RandomIds;
//! use catalog_clone::phases::execute_clone;
//!
//! let request = CloneRequest::new("/path/to/dump", "Items", "Goods");
//! let report = execute_clone(&request, &mut RandomIds).unwrap();
//! println!("new catalog id: {}", report.root_id);
//! ```
//!
//! ## Core Concepts
//!
//! - **Definitions (`definition`, `rewrite`)**: `Catalogs/<Name>.xml` describes
//!   one entity. The rewriter renames it, renames kind-qualified references
//!   to it, and gives every identifier inside it a fresh value.
//! - **Names (`names`, `kind`)**: references look like `CatalogRef.Items` or
//!   `Catalog.Items.Form.Item`. Only the segment after a qualifier of the
//!   entity's kind is renamed.
//! - **Registries (`registry`)**: `Configuration.xml` lists entities by name;
//!   `ConfigDumpInfo.xml` lists them with ids, version locks and nested
//!   records. Updates remove old records for the target and insert one new
//!   record after the last record of the same kind.
//! - **Identifiers (`ident`)**: an `IdGenerator` supplies every new id, random
//!   for real runs and sequential for reproducible ones.
//! - **Phases (`phases`)**: validation, stale target removal, rewriting,
//!   registry updates and a staged commit of all outputs.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::execute_clone`:
//!
//! 1.  **Validate**: names are usable and all input files exist.
//! 2.  **Remove stale target**: delete what an earlier run wrote for the target.
//! 3.  **Rewrite**: the source definition and its auxiliary directory, in memory.
//! 4.  **Update registries**: both index files, in memory.
//! 5.  **Persist**: stage every output, then move them into place.

pub mod config;
pub mod defaults;
pub mod definition;
pub mod error;
pub mod filesystem;
pub mod ident;
pub mod kind;
pub mod lock;
pub mod names;
pub mod output;
pub mod phases;
pub mod registry;
pub mod rewrite;
pub mod xml;

#[cfg(test)]
mod names_proptest;
