//! Lightweight registry: `Configuration.xml`.
//!
//! ```text
//! MetaDataObject
//! └── Configuration
//!     └── ChildObjects
//!         ├── <Language>Russian</Language>
//!         ├── <Catalog>Items</Catalog>
//!         ├── <Catalog>Units</Catalog>
//!         └── <Document>Order</Document>
//! ```
//!
//! Records are grouped by kind in the order of
//! [`CONFIGURATION_KIND_ORDER`](crate::kind::CONFIGURATION_KIND_ORDER).

use std::path::Path;

use log::{debug, warn};
use xot::Node;

use super::{Placement, RegistryUpdate};
use crate::defaults::MD_CLASSES_NS;
use crate::error::{Error, Result};
use crate::kind::MetadataKind;
use crate::xml::XmlDocument;

/// One `ChildObjects` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRecord {
    pub kind: String,
    pub name: String,
}

/// A loaded `Configuration.xml`.
#[derive(Debug)]
pub struct ConfigurationRegistry {
    doc: XmlDocument,
    child_objects: Node,
}

impl ConfigurationRegistry {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_document(XmlDocument::load(path)?)
    }

    pub fn from_document(mut doc: XmlDocument) -> Result<Self> {
        let configuration = doc.name_ns(MD_CLASSES_NS, "Configuration");
        let child_objects = doc.name_ns(MD_CLASSES_NS, "ChildObjects");

        let root = doc.document_element()?;
        let child_objects = doc
            .first_child_named(root, configuration)
            .and_then(|c| doc.first_child_named(c, child_objects))
            .ok_or_else(|| {
                Error::structure(doc.path(), "registry section Configuration/ChildObjects not found")
            })?;

        Ok(Self { doc, child_objects })
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// All records in document order.
    pub fn records(&self) -> Vec<ConfigurationRecord> {
        self.doc
            .child_elements(self.child_objects)
            .into_iter()
            .filter_map(|node| {
                let kind = self.doc.local_name(node)?.to_string();
                let name = self.doc.text(node).trim().to_string();
                Some(ConfigurationRecord { kind, name })
            })
            .collect()
    }

    /// Make `name` the only record of `kind` with that name, placed after the
    /// last remaining record of `kind`.
    pub fn update(&mut self, kind: &MetadataKind, name: &str) -> Result<RegistryUpdate> {
        let kind_name = self.doc.name_ns(MD_CLASSES_NS, kind.element());

        let stale: Vec<Node> = self
            .doc
            .children_named(self.child_objects, kind_name)
            .into_iter()
            .filter(|node| self.doc.text(*node).trim() == name)
            .collect();
        if stale.len() > 1 {
            warn!(
                "{} lists {} {} records named '{}', removing all of them",
                self.doc.path().display(),
                stale.len(),
                kind.element(),
                name
            );
        }
        for node in &stale {
            self.doc.remove_indented(*node)?;
        }

        let record = self.doc.new_element(kind_name);
        self.doc.set_text(record, name)?;

        let placement = self.insert(kind, kind_name, record)?;
        debug!(
            "{}: removed {} stale record(s), inserted {} {}",
            self.doc.path().display(),
            stale.len(),
            kind.compound_name(name),
            placement
        );

        Ok(RegistryUpdate {
            removed: stale.len(),
            placement,
            nested_records: 0,
        })
    }

    fn insert(&mut self, kind: &MetadataKind, kind_name: xot::NameId, record: Node) -> Result<Placement> {
        if let Some(last) = self
            .doc
            .children_named(self.child_objects, kind_name)
            .last()
            .copied()
        {
            self.doc.insert_after_indented(last, record)?;
            return Ok(Placement::AfterLastOfKind);
        }

        let following = kind.following_kinds();
        let next = self.doc.child_elements(self.child_objects).into_iter().find(|node| {
            self.doc
                .local_name(*node)
                .is_some_and(|local| following.iter().any(|k| *k == local))
        });
        if let Some(next) = next {
            let next_kind = self.doc.local_name(next).unwrap_or_default().to_string();
            self.doc.insert_before_indented(next, record)?;
            return Ok(Placement::BeforeKind(next_kind));
        }

        self.doc.append_indented(self.child_objects, record)?;
        Ok(Placement::Appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::CATALOG;

    const CONFIGURATION_XML: &str =
        include_str!("../../tests/testdata/config/Configuration.xml");

    fn registry(text: &str) -> ConfigurationRegistry {
        let doc = XmlDocument::parse(Path::new("Configuration.xml"), text).unwrap();
        ConfigurationRegistry::from_document(doc).unwrap()
    }

    fn minimal(children: &str) -> String {
        format!(
            "<MetaDataObject xmlns=\"http://v8.1c.ru/8.3/MDClasses\">\n\t<Configuration>\n\t\t<ChildObjects>{}\n\t\t</ChildObjects>\n\t</Configuration>\n</MetaDataObject>",
            children
        )
    }

    fn labels(registry: &ConfigurationRegistry) -> Vec<String> {
        registry
            .records()
            .into_iter()
            .map(|r| format!("{}.{}", r.kind, r.name))
            .collect()
    }

    #[test]
    fn test_records_in_document_order() {
        let registry = registry(CONFIGURATION_XML);
        let records = registry.records();
        assert_eq!(records.len(), 8);
        assert_eq!(
            records[4],
            ConfigurationRecord {
                kind: "Catalog".to_string(),
                name: "Предметы".to_string()
            }
        );
    }

    #[test]
    fn test_inserts_after_last_record_of_kind() {
        let mut registry = registry(&minimal(
            "\n\t\t\t<Catalog>A</Catalog>\n\t\t\t<Catalog>B</Catalog>\n\t\t\t<Document>C</Document>",
        ));
        let update = registry.update(&CATALOG, "D").unwrap();
        assert_eq!(update.removed, 0);
        assert_eq!(update.placement, Placement::AfterLastOfKind);
        assert_eq!(
            labels(&registry),
            vec!["Catalog.A", "Catalog.B", "Catalog.D", "Document.C"]
        );
        let out = registry.document().to_xml_string().unwrap();
        assert!(out.contains("<Catalog>B</Catalog>\n\t\t\t<Catalog>D</Catalog>\n\t\t\t<Document>C</Document>"));
    }

    #[test]
    fn test_existing_record_is_replaced_once() {
        let mut registry = registry(CONFIGURATION_XML);
        registry.update(&CATALOG, "Предметы").unwrap();
        let update = registry.update(&CATALOG, "Предметы").unwrap();
        assert_eq!(update.removed, 1);
        let count = registry
            .records()
            .iter()
            .filter(|r| r.kind == "Catalog" && r.name == "Предметы")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_removes_all_duplicates() {
        let mut registry = registry(&minimal(
            "\n\t\t\t<Catalog>X</Catalog>\n\t\t\t<Catalog>A</Catalog>\n\t\t\t<Catalog>X</Catalog>",
        ));
        let update = registry.update(&CATALOG, "X").unwrap();
        assert_eq!(update.removed, 2);
        assert_eq!(labels(&registry), vec!["Catalog.A", "Catalog.X"]);
    }

    #[test]
    fn test_same_name_of_other_kind_is_kept() {
        let mut registry = registry(&minimal(
            "\n\t\t\t<Catalog>A</Catalog>\n\t\t\t<Document>X</Document>",
        ));
        let update = registry.update(&CATALOG, "X").unwrap();
        assert_eq!(update.removed, 0);
        assert_eq!(labels(&registry), vec!["Catalog.A", "Catalog.X", "Document.X"]);
    }

    #[test]
    fn test_falls_back_before_following_kind() {
        let mut registry = registry(&minimal(
            "\n\t\t\t<Language>Ru</Language>\n\t\t\t<Enum>E</Enum>\n\t\t\t<Document>C</Document>",
        ));
        let update = registry.update(&CATALOG, "D").unwrap();
        assert_eq!(update.placement, Placement::BeforeKind("Enum".to_string()));
        assert_eq!(
            labels(&registry),
            vec!["Language.Ru", "Catalog.D", "Enum.E", "Document.C"]
        );
    }

    #[test]
    fn test_appends_when_no_anchor() {
        let mut registry = registry(&minimal("\n\t\t\t<Language>Ru</Language>"));
        let update = registry.update(&CATALOG, "D").unwrap();
        assert_eq!(update.placement, Placement::Appended);
        assert_eq!(labels(&registry), vec!["Language.Ru", "Catalog.D"]);
    }

    #[test]
    fn test_update_is_repeatable_byte_for_byte() {
        let mut registry = registry(CONFIGURATION_XML);
        registry.update(&CATALOG, "УТО_Тест").unwrap();
        let first = registry.document().to_xml_string().unwrap();
        registry.update(&CATALOG, "УТО_Тест").unwrap();
        assert_eq!(registry.document().to_xml_string().unwrap(), first);
    }

    #[test]
    fn test_missing_section_is_structure_error() {
        let doc = XmlDocument::parse(
            Path::new("Configuration.xml"),
            "<MetaDataObject xmlns=\"http://v8.1c.ru/8.3/MDClasses\"><Configuration/></MetaDataObject>",
        )
        .unwrap();
        let err = ConfigurationRegistry::from_document(doc).unwrap_err();
        assert!(matches!(err, Error::Structure { .. }));
    }
}
