//! # Entity Definition Documents
//!
//! One file per metadata entity, e.g. `Catalogs/Items.xml`:
//!
//! ```text
//! MetaDataObject
//! └── Catalog uuid=…                 root identifier
//!     ├── InternalInfo
//!     │   └── xr:GeneratedType name="CatalogObject.Items" category="Object"
//!     │       ├── xr:TypeId
//!     │       └── xr:ValueId
//!     ├── Properties
//!     │   ├── Name                   declared name
//!     │   └── Synonym/v8:item/v8:content
//!     └── ChildObjects               attributes, tabular sections, forms …
//! ```
//!
//! [`EntityDefinition`] wraps the parsed document and resolves these parts.
//! The declared name is mandatory: a document without it does not match the
//! template and is rejected when loaded.

use std::path::Path;

use xot::{NameId, Node};

use crate::defaults::{CORE_NS, MD_CLASSES_NS, READABLE_NS};
use crate::error::{Error, Result};
use crate::kind::MetadataKind;
use crate::xml::XmlDocument;

/// A generated type declared under the entity's `InternalInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    pub name: String,
    pub category: Option<String>,
    pub type_id: Option<String>,
    pub value_id: Option<String>,
}

/// Interned element and attribute names used in definition documents.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DefinitionNames {
    pub properties: NameId,
    pub name: NameId,
    pub synonym: NameId,
    pub item: NameId,
    pub content: NameId,
    pub internal_info: NameId,
    pub generated_type: NameId,
    pub type_id: NameId,
    pub value_id: NameId,
    pub uuid: NameId,
    pub name_attr: NameId,
    pub category_attr: NameId,
}

impl DefinitionNames {
    fn intern(doc: &mut XmlDocument) -> Self {
        Self {
            properties: doc.name_ns(MD_CLASSES_NS, "Properties"),
            name: doc.name_ns(MD_CLASSES_NS, "Name"),
            synonym: doc.name_ns(MD_CLASSES_NS, "Synonym"),
            item: doc.name_ns(CORE_NS, "item"),
            content: doc.name_ns(CORE_NS, "content"),
            internal_info: doc.name_ns(MD_CLASSES_NS, "InternalInfo"),
            generated_type: doc.name_ns(READABLE_NS, "GeneratedType"),
            type_id: doc.name_ns(READABLE_NS, "TypeId"),
            value_id: doc.name_ns(READABLE_NS, "ValueId"),
            uuid: doc.name("uuid"),
            name_attr: doc.name("name"),
            category_attr: doc.name("category"),
        }
    }
}

/// A parsed entity definition.
#[derive(Debug)]
pub struct EntityDefinition {
    doc: XmlDocument,
    entity: Node,
    name_field: Node,
    pub(crate) names: DefinitionNames,
}

impl EntityDefinition {
    pub fn load(path: &Path, kind: &MetadataKind) -> Result<Self> {
        Self::from_document(XmlDocument::load(path)?, kind)
    }

    pub fn from_document(mut doc: XmlDocument, kind: &MetadataKind) -> Result<Self> {
        let names = DefinitionNames::intern(&mut doc);
        let kind_name = doc.name_ns(MD_CLASSES_NS, kind.element());

        let root = doc.document_element()?;
        let entity = if doc.is_named(root, kind_name) {
            root
        } else {
            doc.first_child_named(root, kind_name).ok_or_else(|| {
                Error::structure(
                    doc.path(),
                    format!("no <{}> element under the document root", kind.element()),
                )
            })?
        };

        let name_field = doc
            .first_child_named(entity, names.properties)
            .and_then(|p| doc.first_child_named(p, names.name))
            .ok_or_else(|| {
                Error::structure(doc.path(), "declared name field Properties/Name not found")
            })?;

        Ok(Self {
            doc,
            entity,
            name_field,
            names,
        })
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    pub(crate) fn document_mut(&mut self) -> &mut XmlDocument {
        &mut self.doc
    }

    /// The entity element (`<Catalog uuid=…>`).
    pub fn entity(&self) -> Node {
        self.entity
    }

    pub(crate) fn name_field(&self) -> Node {
        self.name_field
    }

    /// The declared name.
    pub fn name(&self) -> String {
        self.doc.text(self.name_field).trim().to_string()
    }

    /// The root identifier, if the entity carries one.
    pub fn root_id(&self) -> Option<String> {
        self.doc.attribute(self.entity, self.names.uuid)
    }

    /// `v8:content` nodes of every localized synonym item.
    pub(crate) fn synonym_contents(&self) -> Vec<Node> {
        let Some(properties) = self.doc.first_child_named(self.entity, self.names.properties)
        else {
            return Vec::new();
        };
        let Some(synonym) = self.doc.first_child_named(properties, self.names.synonym) else {
            return Vec::new();
        };
        self.doc
            .children_named(synonym, self.names.item)
            .into_iter()
            .filter_map(|item| self.doc.first_child_named(item, self.names.content))
            .collect()
    }

    /// Localized synonym labels.
    pub fn synonyms(&self) -> Vec<String> {
        self.synonym_contents()
            .into_iter()
            .map(|n| self.doc.text(n))
            .collect()
    }

    /// Generated types declared directly on the entity, in document order.
    pub fn generated_types(&self) -> Vec<GeneratedType> {
        let Some(info) = self
            .doc
            .first_child_named(self.entity, self.names.internal_info)
        else {
            return Vec::new();
        };
        self.doc
            .children_named(info, self.names.generated_type)
            .into_iter()
            .map(|node| self.generated_type(node))
            .collect()
    }

    fn generated_type(&self, node: Node) -> GeneratedType {
        let child_text = |name| {
            self.doc
                .first_child_named(node, name)
                .map(|n| self.doc.text(n).trim().to_string())
        };
        GeneratedType {
            name: self
                .doc
                .attribute(node, self.names.name_attr)
                .unwrap_or_default(),
            category: self.doc.attribute(node, self.names.category_attr),
            type_id: child_text(self.names.type_id),
            value_id: child_text(self.names.value_id),
        }
    }

    /// Every identifier in the entity: `uuid` attributes of the entity and
    /// its children, plus all type and value ids, in document order.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let mut nodes = vec![self.entity];
        nodes.extend(self.doc.descendant_elements(self.entity));
        for node in nodes {
            if let Some(uuid) = self.doc.attribute(node, self.names.uuid) {
                ids.push(uuid);
            }
            if self.doc.is_named(node, self.names.type_id)
                || self.doc.is_named(node, self.names.value_id)
            {
                ids.push(self.doc.text(node).trim().to_string());
            }
        }
        ids
    }

    /// Every text value and `name` attribute below the entity.
    pub fn reference_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        for node in self.doc.descendant_elements(self.entity) {
            if self.doc.is_text_leaf(node) {
                values.push(self.doc.text(node));
            }
            if let Some(name) = self.doc.attribute(node, self.names.name_attr) {
                values.push(name);
            }
        }
        values
    }
}
