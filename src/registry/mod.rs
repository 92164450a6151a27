//! # Registries
//!
//! Two index files list every entity of a configuration and must agree with
//! the definitions on disk:
//!
//! - [`configuration`]: `Configuration.xml`, names only, grouped by kind.
//! - [`dump_info`]: `ConfigDumpInfo.xml`, compound names with identifiers,
//!   version locks and nested records for the entity's sub-objects.
//!
//! Both updaters share the same contract: remove every record for the target,
//! then insert exactly one new record directly after the last record of the
//! same kind, leaving all other records where they were.

use std::fmt;

pub mod configuration;
pub mod dump_info;

pub use configuration::ConfigurationRegistry;
pub use dump_info::{DumpInfoRegistry, DumpRecord};

/// Where a new record was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the last record of the same kind.
    AfterLastOfKind,
    /// No record of the kind existed; placed in front of the first record of
    /// the named kind that follows it in the kind ordering.
    BeforeKind(String),
    /// No anchor found; appended at the end.
    Appended,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::AfterLastOfKind => write!(f, "after the last record of its kind"),
            Placement::BeforeKind(kind) => write!(f, "before the first {} record", kind),
            Placement::Appended => write!(f, "at the end"),
        }
    }
}

/// Result of updating one registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUpdate {
    /// Pre-existing records for the target that were removed.
    pub removed: usize,
    pub placement: Placement,
    /// Nested records created under the new record.
    pub nested_records: usize,
}
