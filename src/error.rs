//! # Error Handling
//!
//! This module defines the centralized error type for `catalog-clone`. It uses
//! the `thiserror` library to build an `Error` enum covering every failure
//! mode of a clone run, with enough context (file paths, entity names) to
//! tell the user what to fix.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into four groups:
//!   - missing inputs, detected before anything is touched
//!     (`MissingInput`, `InvalidName`, `SameName`);
//!   - documents that do not have the expected shape (`Structure`,
//!     `XmlParse`, `Xml`);
//!   - filesystem failures (`Filesystem`), plus `Regex` for a name pattern
//!     that fails to compile;
//!   - a concurrent run holding the configuration lock (`LockBusy`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors are retried. They propagate to the CLI, which reports
//! them and exits with a non-zero status.

use std::path::Path;

use thiserror::Error;

/// Main error type for catalog-clone operations
#[derive(Error, Debug)]
pub enum Error {
    /// A file the clone needs to read does not exist.
    #[error("Required file not found: {path}")]
    MissingInput { path: String },

    /// An entity name cannot be used as a metadata name.
    #[error("Invalid entity name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// Source and target name are identical.
    #[error("Source and target are both '{name}': cloning an entity onto itself would orphan its identifiers")]
    SameName { name: String },

    /// An expected element or section is missing from a document.
    #[error("Unexpected structure in {file}: {message}")]
    Structure { file: String, message: String },

    /// A document could not be parsed as XML.
    #[error("XML parsing error in {file}: {message}")]
    XmlParse { file: String, message: String },

    /// An XML tree operation or serialization failed.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// A filesystem operation failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// Another run holds the lock on the configuration tree.
    #[error("Configuration is locked by another run: {path}\n  hint: remove the lock file if no other run is active")]
    LockBusy { path: String },

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn structure(file: &Path, message: impl Into<String>) -> Self {
        Error::Structure {
            file: file.display().to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Error::Xml {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
