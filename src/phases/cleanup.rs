//! Phase 2: Removing Stale Target Artifacts
//!
//! A previous run may have left a target definition, a target auxiliary
//! directory, or staging files from an interrupted commit. Removing them
//! first makes a rerun start from the same state as the first run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::persist::staging_path;
use crate::config::ConfigLayout;
use crate::error::{Error, Result};

/// Artifacts of an earlier clone into the same target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaleArtifacts {
    pub definition: Option<PathBuf>,
    pub auxiliary_dir: Option<PathBuf>,
    /// Leftovers of an interrupted commit.
    pub staged: Vec<PathBuf>,
}

impl StaleArtifacts {
    pub fn is_empty(&self) -> bool {
        self.definition.is_none() && self.auxiliary_dir.is_none() && self.staged.is_empty()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.definition
            .iter()
            .chain(self.auxiliary_dir.iter())
            .chain(self.staged.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Find what [`execute`] would remove, without removing it.
pub fn plan(layout: &ConfigLayout, target: &str) -> StaleArtifacts {
    let definition = layout.definition_file(target);
    let auxiliary_dir = layout.auxiliary_dir(target);

    let staged = [
        definition.clone(),
        auxiliary_dir.clone(),
        layout.configuration_file(),
        layout.dump_info_file(),
    ]
    .iter()
    .map(|path| staging_path(path))
    .filter(|path| path.exists())
    .collect();

    StaleArtifacts {
        definition: definition.is_file().then_some(definition),
        auxiliary_dir: auxiliary_dir.is_dir().then_some(auxiliary_dir),
        staged,
    }
}

/// Remove the target's stale artifacts.
pub fn execute(layout: &ConfigLayout, target: &str) -> Result<StaleArtifacts> {
    let stale = plan(layout, target);
    for path in stale.paths() {
        debug!("Removing stale {}", path.display());
        remove(path)?;
    }
    if !stale.is_empty() {
        info!("Removed {} stale artifact(s) of '{}'", stale.paths().len(), target);
    }
    Ok(stale)
}

pub(crate) fn remove(path: &Path) -> Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::Filesystem {
        message: format!("Failed to remove '{}': {}", path.display(), e),
    })
}
