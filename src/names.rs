//! Scoped renaming of compound reference strings.
//!
//! An entity's name shows up inside dot-qualified references such as
//! `CatalogObject.Items`, `cfg:CatalogRef.Items` or
//! `Catalog.Items.StandardAttribute.Description`. Renaming the entity means
//! rewriting the segment that directly follows a qualifier of the entity's
//! kind, and nothing else:
//!
//! - `Catalog.ItemsArchive` is a different entity and stays as is;
//! - `Document.Items` refers to another kind and stays as is;
//! - `Catalog.Other.Attribute.Items` names an attribute, not the entity.
//!
//! Segment boundaries are Unicode word boundaries, so Cyrillic names behave
//! the same as Latin ones.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::kind::MetadataKind;

/// Rewrites kind-qualified references from one entity name to another.
#[derive(Debug, Clone)]
pub struct NameRewriter {
    pattern: Regex,
    source: String,
    target: String,
}

impl NameRewriter {
    pub fn new(kind: &MetadataKind, source: &str, target: &str) -> Result<Self> {
        let qualifiers = kind
            .qualifiers()
            .iter()
            .map(|q| regex::escape(q))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"\b((?:{})\w*)\.{}\b",
            qualifiers,
            regex::escape(source)
        ))?;
        Ok(Self {
            pattern,
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Rewrite every qualified occurrence of the source name in `value`.
    ///
    /// Returns the input unchanged (borrowed) when nothing matched.
    pub fn rewrite<'a>(&self, value: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(value, |caps: &Captures| format!("{}.{}", &caps[1], self.target))
    }

    /// Whether `value` still contains a qualified reference to the source.
    pub fn references_source(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }
}
