//! Rich registry: `ConfigDumpInfo.xml`.
//!
//! ```text
//! ConfigDumpInfo
//! └── ConfigVersions
//!     ├── Metadata name="Catalog.Items" id=… configVersion=…
//!     │   ├── Metadata name="Catalog.Items.Attribute.Code" id=…
//!     │   └── Metadata name="Catalog.Items.Form.Item" id=…
//!     │       └── Metadata name="Catalog.Items.Form.Item.Form" id=…
//!     └── Metadata name="Document.Order" id=… configVersion=…
//! ```
//!
//! The record of a new entity is shaped after the record of the entity it was
//! cloned from: every nested record is mirrored with its compound name
//! renamed. A nested record of an object the definition or its auxiliary
//! files already re-identified takes that object's new id; the others get a
//! fresh one. The version lock is set to
//! [`UNSYNCHRONIZED_VERSION`] so the platform treats the entity as changed.

use std::path::Path;

use log::{debug, warn};
use uuid::Uuid;
use xot::{NameId, Node};

use super::{Placement, RegistryUpdate};
use crate::defaults::{DUMP_INFO_NS, UNSYNCHRONIZED_VERSION};
use crate::error::{Error, Result};
use crate::ident::{IdGenerator, IdMap};
use crate::kind::MetadataKind;
use crate::names::NameRewriter;
use crate::xml::XmlDocument;

/// One `Metadata` record and its nested records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRecord {
    pub name: String,
    pub id: Option<String>,
    pub config_version: Option<String>,
    pub nested: Vec<DumpRecord>,
}

impl DumpRecord {
    /// Number of records below this one, at any depth.
    pub fn nested_count(&self) -> usize {
        self.nested.iter().map(|n| 1 + n.nested_count()).sum()
    }

    /// Identifiers of this record and all nested records.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.id.iter().cloned().collect();
        for nested in &self.nested {
            ids.extend(nested.ids());
        }
        ids
    }
}

#[derive(Debug, Clone, Copy)]
struct DumpNames {
    metadata: NameId,
    name: NameId,
    id: NameId,
    config_version: NameId,
}

/// A loaded `ConfigDumpInfo.xml`.
#[derive(Debug)]
pub struct DumpInfoRegistry {
    doc: XmlDocument,
    config_versions: Node,
    names: DumpNames,
}

impl DumpInfoRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_document(XmlDocument::load(path)?)
    }

    pub fn from_document(mut doc: XmlDocument) -> Result<Self> {
        let names = DumpNames {
            metadata: doc.name_ns(DUMP_INFO_NS, "Metadata"),
            name: doc.name("name"),
            id: doc.name("id"),
            config_version: doc.name("configVersion"),
        };
        let config_versions = doc.name_ns(DUMP_INFO_NS, "ConfigVersions");

        let root = doc.document_element()?;
        let config_versions = doc
            .first_child_named(root, config_versions)
            .ok_or_else(|| Error::structure(doc.path(), "registry section ConfigVersions not found"))?;

        Ok(Self {
            doc,
            config_versions,
            names,
        })
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// Top-level records in document order.
    pub fn records(&self) -> Vec<DumpRecord> {
        self.top_level()
            .into_iter()
            .map(|node| self.read_record(node))
            .collect()
    }

    /// The first top-level record named `compound_name`.
    pub fn record(&self, compound_name: &str) -> Option<DumpRecord> {
        self.find(compound_name)
            .first()
            .map(|node| self.read_record(*node))
    }

    fn top_level(&self) -> Vec<Node> {
        self.doc
            .children_named(self.config_versions, self.names.metadata)
    }

    fn record_name(&self, node: Node) -> Option<String> {
        self.doc.attribute(node, self.names.name)
    }

    fn find(&self, compound_name: &str) -> Vec<Node> {
        self.top_level()
            .into_iter()
            .filter(|node| self.record_name(*node).as_deref() == Some(compound_name))
            .collect()
    }

    fn read_record(&self, node: Node) -> DumpRecord {
        DumpRecord {
            name: self.record_name(node).unwrap_or_default(),
            id: self.doc.attribute(node, self.names.id),
            config_version: self.doc.attribute(node, self.names.config_version),
            nested: self
                .doc
                .children_named(node, self.names.metadata)
                .into_iter()
                .map(|child| self.read_record(child))
                .collect(),
        }
    }

    /// Make the target entity's record the only one with its compound name.
    ///
    /// The new record gets `new_id`, the unsynchronized version lock, and one
    /// nested record per nested record of the source entity's record, each
    /// renamed with `names`. Nested ids go through `id_map`. Without a source
    /// record the new record has no nested records.
    pub fn update<G: IdGenerator>(
        &mut self,
        kind: &MetadataKind,
        names: &NameRewriter,
        new_id: Uuid,
        id_map: &mut IdMap,
        ids: &mut G,
    ) -> Result<RegistryUpdate> {
        let source_name = kind.compound_name(names.source());
        let target_name = kind.compound_name(names.target());

        let template = self.record(&source_name);
        if template.is_none() {
            warn!(
                "{} has no record for {}, creating {} without nested records",
                self.doc.path().display(),
                source_name,
                target_name
            );
        }

        let stale = self.find(&target_name);
        if stale.len() > 1 {
            warn!(
                "{} lists {} records named '{}', removing all of them",
                self.doc.path().display(),
                stale.len(),
                target_name
            );
        }
        for node in &stale {
            self.doc.remove_indented(*node)?;
        }

        let prefix = kind.compound_prefix();
        let anchor = self
            .top_level()
            .into_iter()
            .rev()
            .find(|node| {
                self.record_name(*node)
                    .is_some_and(|name| name.starts_with(&prefix))
            });
        let indent = self.record_indent(anchor);
        let unit = self.doc.indent_unit(self.config_versions);

        let record = self.new_record(&target_name, &new_id.to_string());
        let version = self.names.config_version;
        self.doc.set_attribute(record, version, UNSYNCHRONIZED_VERSION);

        let nested = template.map(|t| t.nested).unwrap_or_default();
        let mut ctx = NestedContext { names, id_map, ids };
        let nested_records = self.fill_nested(record, &nested, &mut ctx, indent.as_deref(), &unit)?;

        let placement = match anchor {
            Some(anchor) => {
                self.doc.insert_after_indented(anchor, record)?;
                Placement::AfterLastOfKind
            }
            None => {
                self.doc.append_indented(self.config_versions, record)?;
                Placement::Appended
            }
        };

        debug!(
            "{}: removed {} stale record(s), inserted {} with {} nested record(s) {}",
            self.doc.path().display(),
            stale.len(),
            target_name,
            nested_records,
            placement
        );

        Ok(RegistryUpdate {
            removed: stale.len(),
            placement,
            nested_records,
        })
    }

    /// Indentation the new top-level record will receive.
    fn record_indent(&self, anchor: Option<Node>) -> Option<String> {
        if let Some(anchor) = anchor {
            return self.doc.indent_of(anchor);
        }
        if let Some(last) = self.top_level().last() {
            return self.doc.indent_of(*last);
        }
        self.doc
            .indent_of(self.config_versions)
            .map(|indent| format!("{}{}", indent, self.doc.indent_unit(self.config_versions)))
    }

    fn new_record(&mut self, name: &str, id: &str) -> Node {
        let record = self.doc.new_element(self.names.metadata);
        let (name_attr, id_attr) = (self.names.name, self.names.id);
        self.doc.set_attribute(record, name_attr, name);
        self.doc.set_attribute(record, id_attr, id);
        record
    }

    /// Build renamed copies of `templates` under the detached `parent`.
    /// Returns the number of records created at any depth.
    fn fill_nested<G: IdGenerator>(
        &mut self,
        parent: Node,
        templates: &[DumpRecord],
        ctx: &mut NestedContext<'_, G>,
        parent_indent: Option<&str>,
        unit: &str,
    ) -> Result<usize> {
        let child_indent = parent_indent.map(|indent| format!("{}{}", indent, unit));

        let mut created = 0;
        let mut children = Vec::with_capacity(templates.len());
        for template in templates {
            let name = ctx.names.rewrite(&template.name).into_owned();
            let id = match &template.id {
                Some(old) => ctx.id_map.replace(old, ctx.ids),
                None => ctx.ids.next_id(),
            };
            let child = self.new_record(&name, &id.to_string());
            created += 1 + self.fill_nested(
                child,
                &template.nested,
                ctx,
                child_indent.as_deref(),
                unit,
            )?;
            children.push(child);
        }

        self.doc.append_block(parent, &children, parent_indent, unit)?;
        Ok(created)
    }
}

/// What nested records are built from.
struct NestedContext<'a, G> {
    names: &'a NameRewriter,
    id_map: &'a mut IdMap,
    ids: &'a mut G,
}
