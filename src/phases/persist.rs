//! Phase 5: Persisting
//!
//! Every output is first written next to its final path under a staging
//! name (`<name>.catalog-clone-tmp`). Only when all of them were staged are
//! they renamed into place, in the order given by the caller. If staging
//! fails, the staged files are removed and no final file has changed. If a
//! rename fails, the outputs already moved stay and the rest of the staged
//! files are removed.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::cleanup::remove;
use crate::defaults::STAGING_SUFFIX;
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;

/// Content to be written to one path.
#[derive(Debug, Clone)]
pub enum Content {
    /// A single file.
    File(String),
    /// A directory tree, replacing any directory at the path.
    Dir(MemoryFS),
}

/// One output of the commit.
#[derive(Debug, Clone)]
pub struct Output {
    pub path: PathBuf,
    pub content: Content,
}

impl Output {
    pub fn file(path: impl Into<PathBuf>, text: String) -> Self {
        Self {
            path: path.into(),
            content: Content::File(text),
        }
    }

    pub fn dir(path: impl Into<PathBuf>, files: MemoryFS) -> Self {
        Self {
            path: path.into(),
            content: Content::Dir(files),
        }
    }
}

/// The staging path of `path`: a sibling with [`STAGING_SUFFIX`] appended.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}

/// Stage all outputs, then rename them into place in order.
///
/// Returns the final paths written.
pub fn execute(outputs: &[Output]) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(outputs.len());
    for output in outputs {
        let staging = staging_path(&output.path);
        if let Err(e) = stage(output, &staging) {
            staged.push(staging);
            discard(&staged);
            return Err(e);
        }
        debug!("Staged {}", staging.display());
        staged.push(staging);
    }

    for (i, (output, staging)) in outputs.iter().zip(&staged).enumerate() {
        if let Err(e) = commit(output, staging) {
            discard(&staged[i..]);
            return Err(e);
        }
    }

    info!("Wrote {} output(s)", outputs.len());
    Ok(outputs.iter().map(|o| o.path.clone()).collect())
}

fn stage(output: &Output, staging: &Path) -> Result<()> {
    if staging.exists() {
        remove(staging)?;
    }
    match &output.content {
        Content::File(text) => fs::write(staging, text).map_err(|e| Error::Filesystem {
            message: format!("Failed to write '{}': {}", staging.display(), e),
        }),
        Content::Dir(files) => files.write_to(staging),
    }
}

fn commit(output: &Output, staging: &Path) -> Result<()> {
    if matches!(output.content, Content::Dir(_)) && output.path.exists() {
        remove(&output.path)?;
    }
    fs::rename(staging, &output.path).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to move '{}' to '{}': {}",
            staging.display(),
            output.path.display(),
            e
        ),
    })
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        if path.exists() {
            if let Err(e) = remove(path) {
                warn!("{}", e);
            }
        }
    }
}
