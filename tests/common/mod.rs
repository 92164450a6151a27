//! Shared test utilities for integration and E2E tests.
//!
//! The fixture copies `tests/testdata/config`, a small configuration dump,
//! into a temporary directory so every test can mutate its own copy.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.command().arg("--target").arg("Goods").assert().success();
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{names, TestFixture};
}

/// Entity names of the fixture dump.
#[allow(dead_code)]
pub mod names {
    /// Catalog with generated types, child objects and an auxiliary directory.
    pub const SOURCE: &str = "Предметы";
    /// Default target of the CLI, not present in the fixture.
    pub const TARGET: &str = "УТО_Тест";
    /// Catalog whose name starts with the source name.
    pub const SIMILAR: &str = "ПредметыАрхив";
}

/// Directory holding the pristine fixture dump.
#[allow(dead_code)]
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata/config")
}

/// A temporary copy of the fixture configuration dump.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture holding a copy of the fixture dump.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .copy_from(testdata_dir(), &["**"])
            .expect("Failed to copy fixture dump");
        Self { temp_dir }
    }

    /// Create a fixture with an empty temporary directory.
    pub fn empty() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Replace or add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Remove a file of the dump.
    pub fn without_file(self, path: &str) -> Self {
        fs::remove_file(self.path().join(path)).expect("Failed to remove file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file of the dump as UTF-8.
    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Contents of every file in the dump, keyed by relative path.
    pub fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(self.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e.path().strip_prefix(self.path()).unwrap().to_path_buf();
                let content = fs::read(e.path()).unwrap();
                (relative, content)
            })
            .collect();
        files.sort();
        files
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("catalog-clone");
        cmd.current_dir(self.path())
            .env_remove("CATALOG_CLONE_CONFIG_PATH")
            .env_remove("CATALOG_CLONE_SOURCE")
            .env_remove("CATALOG_CLONE_TARGET")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
