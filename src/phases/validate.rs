//! Phase 1: Validation
//!
//! Checks everything that can be checked without touching the disk: both
//! names are usable metadata names, they differ, and every file the clone
//! reads exists. A failure here leaves the configuration tree untouched.

use std::path::Path;

use log::debug;

use crate::config::CloneRequest;
use crate::error::{Error, Result};

/// Run all checks for `request`.
pub fn execute(request: &CloneRequest) -> Result<()> {
    validate_name(&request.source)?;
    validate_name(&request.target)?;
    if request.source == request.target {
        return Err(Error::SameName {
            name: request.source.clone(),
        });
    }

    let layout = request.layout();
    if !layout.root().is_dir() {
        return missing(layout.root());
    }
    for path in [
        layout.definition_file(&request.source),
        layout.configuration_file(),
        layout.dump_info_file(),
    ] {
        if !path.is_file() {
            return missing(&path);
        }
    }

    debug!(
        "Validated clone of {} into {} under {}",
        request.kind.compound_name(&request.source),
        request.kind.compound_name(&request.target),
        layout.root().display()
    );
    Ok(())
}

fn missing(path: &Path) -> Result<()> {
    Err(Error::MissingInput {
        path: path.display().to_string(),
    })
}

/// A metadata name: letters, digits and underscores, not starting with a
/// digit.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |message: &str| {
        Err(Error::InvalidName {
            name: name.to_string(),
            message: message.to_string(),
        })
    };

    let Some(first) = name.chars().next() else {
        return invalid("name is empty");
    };
    if first.is_numeric() {
        return invalid("name must not start with a digit");
    }
    if let Some(c) = name.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
        return invalid(&format!("character '{}' is not allowed", c));
    }
    Ok(())
}
