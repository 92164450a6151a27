//! # Clone Request and Configuration Layout
//!
//! A clone run is fully described by a [`CloneRequest`]: where the
//! configuration dump lives, which entity to copy, what to call the copy, and
//! whether to touch the disk at all. [`ConfigLayout`] derives every file the
//! run reads or writes from the configuration root:
//!
//! ```text
//! <root>/
//!   Configuration.xml           lightweight registry
//!   ConfigDumpInfo.xml          rich registry
//!   Catalogs/<Name>.xml         entity definition
//!   Catalogs/<Name>/            auxiliary fragments (optional)
//!   .catalog-clone.lock         present while a run is active
//! ```

use std::path::{Path, PathBuf};

use crate::defaults::{CONFIGURATION_FILE, DUMP_INFO_FILE, LOCK_FILE};
use crate::kind::{MetadataKind, CATALOG};

/// Paths inside one configuration dump.
#[derive(Debug, Clone)]
pub struct ConfigLayout {
    root: PathBuf,
    kind: MetadataKind,
}

impl ConfigLayout {
    pub fn new(root: impl Into<PathBuf>, kind: MetadataKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Catalogs/`
    pub fn kind_dir(&self) -> PathBuf {
        self.root.join(self.kind.directory())
    }

    /// `Catalogs/<name>.xml`
    pub fn definition_file(&self, name: &str) -> PathBuf {
        self.kind_dir().join(format!("{}.xml", name))
    }

    /// `Catalogs/<name>/`
    pub fn auxiliary_dir(&self, name: &str) -> PathBuf {
        self.kind_dir().join(name)
    }

    pub fn configuration_file(&self) -> PathBuf {
        self.root.join(CONFIGURATION_FILE)
    }

    pub fn dump_info_file(&self) -> PathBuf {
        self.root.join(DUMP_INFO_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }
}

/// Everything needed to run one clone.
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// Root of the configuration dump
    pub config_root: PathBuf,
    /// Entity to copy
    pub source: String,
    /// Name of the new entity
    pub target: String,
    /// Kind of both entities
    pub kind: MetadataKind,
    /// Compute and report changes without touching the disk
    pub dry_run: bool,
}

impl CloneRequest {
    /// A catalog clone request that writes its results.
    pub fn new(
        config_root: impl Into<PathBuf>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            config_root: config_root.into(),
            source: source.into(),
            target: target.into(),
            kind: CATALOG,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn layout(&self) -> ConfigLayout {
        ConfigLayout::new(self.config_root.clone(), self.kind)
    }
}
