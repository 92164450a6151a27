//! Advisory lock on a configuration tree.
//!
//! A run creates the lock file with `create_new` and removes it when the
//! guard is dropped, so two runs against the same tree cannot interleave
//! their registry writes. A lock file left behind by a killed process has to
//! be removed by hand.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Holds the lock until dropped.
#[derive(Debug)]
pub struct ConfigLock {
    path: PathBuf,
    _file: File,
}

impl ConfigLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                let _ = writeln!(file, "pid={}", std::process::id());
                debug!("Acquired lock {}", path.display());
                Ok(Self {
                    path: path.to_path_buf(),
                    _file: file,
                })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::LockBusy {
                path: path.display().to_string(),
            }),
            Err(e) => Err(Error::Filesystem {
                message: format!("Failed to create lock file '{}': {}", path.display(), e),
            }),
        }
    }
}

impl Drop for ConfigLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_is_exclusive_and_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".catalog-clone.lock");

        let lock = ConfigLock::acquire(&path).unwrap();
        assert!(path.exists());
        assert!(fs::read_to_string(&path).unwrap().starts_with("pid="));

        let err = ConfigLock::acquire(&path).unwrap_err();
        assert!(matches!(err, Error::LockBusy { .. }));

        drop(lock);
        assert!(!path.exists());
        assert!(ConfigLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_missing_directory_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLock::acquire(&dir.path().join("nope/.lock")).unwrap_err();
        assert!(matches!(err, Error::Filesystem { .. }));
    }
}
