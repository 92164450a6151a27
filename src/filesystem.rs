//! In-memory file tree used to stage a directory before it is written

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A file with content and permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
    /// Unix permission bits
    pub permissions: u32,
}

impl File {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content,
            permissions: 0o644,
        }
    }

    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }
}

/// Files keyed by path relative to the tree root, in sorted order
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, File>,
}

impl MemoryFS {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every regular file below `root`.
    pub fn load_dir(root: &Path) -> Result<Self> {
        let mut memfs = Self::new();
        for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", root.display(), e),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).map_err(|_| Error::Filesystem {
                message: format!("Failed to make path relative: {}", path.display()),
            })?;
            let content = fs::read(path).map_err(|e| Error::Filesystem {
                message: format!("Failed to read '{}': {}", path.display(), e),
            })?;

            let mut file = File::new(content);
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Ok(metadata) = entry.metadata() {
                    file.permissions = metadata.permissions().mode() & 0o777;
                }
            }
            memfs.add_file(relative, file);
        }
        Ok(memfs)
    }

    /// Add or replace a file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) {
        self.files.insert(path.as_ref().to_path_buf(), file);
    }

    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) {
        self.add_file(path, File::from_string(content));
    }

    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &File)> {
        self.files.iter()
    }

    /// Write every file below `root`, creating directories as needed.
    pub fn write_to(&self, root: &Path) -> Result<()> {
        fs::create_dir_all(root).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", root.display(), e),
        })?;

        for (relative_path, file) in &self.files {
            let full_path = root.join(relative_path);

            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                    message: format!("Failed to create directory '{}': {}", parent.display(), e),
                })?;
            }

            fs::write(&full_path, &file.content).map_err(|e| Error::Filesystem {
                message: format!("Failed to write file '{}': {}", full_path.display(), e),
            })?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = fs::Permissions::from_mode(file.permissions);
                fs::set_permissions(&full_path, perms).map_err(|e| Error::Filesystem {
                    message: format!(
                        "Failed to set permissions on '{}': {}",
                        full_path.display(),
                        e
                    ),
                })?;
            }
        }

        Ok(())
    }
}
