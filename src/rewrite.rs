//! # Structural Rewriter
//!
//! Turns a parsed copy of the source definition into the definition of the
//! new entity. The rewrite runs in a fixed order:
//!
//! 1. The declared name becomes the target name.
//! 2. Every localized synonym becomes the target name.
//! 3. Kind-qualified references to the source (`CatalogRef.Source`,
//!    `Catalog.Source.Form.X`) are renamed in text values and `name`
//!    attributes. A bare value equal to the source name is left alone, as it
//!    usually names something else (an attribute, a form title).
//! 4. Every generated type below the entity gets a fresh `TypeId` and
//!    `ValueId`, in document order. A missing id is skipped with a warning.
//! 5. The entity gets a fresh root identifier.
//! 6. Every child object carrying a `uuid` attribute gets a fresh one.
//!
//! All identifiers come from the caller's [`IdGenerator`], so the ids of a
//! clone are never shared with the source or with each other. Root and child
//! identifiers are recorded in the caller's [`IdMap`], so the auxiliary files
//! and the rich registry can give the same objects the same new ids.

use log::{debug, warn};
use uuid::Uuid;

use crate::definition::EntityDefinition;
use crate::error::Result;
use crate::ident::{IdGenerator, IdMap};
use crate::names::NameRewriter;

/// What a rewrite changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// New root identifier of the entity.
    pub root_id: Uuid,
    /// Number of identifiers replaced, the root included.
    pub regenerated_ids: usize,
    /// Number of text values and attributes whose references were renamed.
    pub renamed_references: usize,
    /// Number of generated types below the entity.
    pub generated_types: usize,
}

/// Rewrite `definition` in place from `names.source()` to `names.target()`.
///
/// Replaced `uuid` attributes are recorded in `id_map`.
pub fn rewrite_definition<G: IdGenerator>(
    definition: &mut EntityDefinition,
    names: &NameRewriter,
    id_map: &mut IdMap,
    ids: &mut G,
) -> Result<RewriteOutcome> {
    let declared = definition.name();
    if declared != names.source() {
        warn!(
            "{} declares name '{}', expected '{}'",
            definition.document().path().display(),
            declared,
            names.source()
        );
    }

    let name_field = definition.name_field();
    definition
        .document_mut()
        .set_text(name_field, names.target())?;

    let synonyms = definition.synonym_contents();
    if synonyms.is_empty() {
        debug!("No synonyms to update");
    }
    for content in synonyms {
        definition
            .document_mut()
            .set_text(content, names.target())?;
    }

    let renamed_references = rename_references(definition, names)?;
    let (generated_types, type_ids) = regenerate_type_ids(definition, ids)?;

    let root_id = match definition.root_id() {
        Some(old) => id_map.replace(&old, ids),
        None => ids.next_id(),
    };
    let entity = definition.entity();
    let uuid_attr = definition.names.uuid;
    definition
        .document_mut()
        .set_attribute(entity, uuid_attr, &root_id.to_string());

    let child_ids = regenerate_child_ids(definition, id_map, ids);

    debug!(
        "Rewrote definition: {} references renamed, {} generated types, {} child objects",
        renamed_references, generated_types, child_ids
    );

    Ok(RewriteOutcome {
        root_id,
        regenerated_ids: 1 + type_ids + child_ids,
        renamed_references,
        generated_types,
    })
}

fn rename_references(definition: &mut EntityDefinition, names: &NameRewriter) -> Result<usize> {
    let name_attr = definition.names.name_attr;
    let nodes = definition
        .document()
        .descendant_elements(definition.entity());

    let mut renamed = 0;
    for node in nodes {
        let doc = definition.document_mut();
        if doc.is_text_leaf(node) {
            let text = doc.text(node);
            if names.references_source(&text) {
                let new_text = names.rewrite(&text).into_owned();
                doc.set_text(node, &new_text)?;
                renamed += 1;
            }
        }
        if let Some(value) = doc.attribute(node, name_attr) {
            if names.references_source(&value) {
                let new_value = names.rewrite(&value).into_owned();
                doc.set_attribute(node, name_attr, &new_value);
                renamed += 1;
            }
        }
    }
    Ok(renamed)
}

/// Returns the number of generated types and of identifiers replaced.
fn regenerate_type_ids<G: IdGenerator>(
    definition: &mut EntityDefinition,
    ids: &mut G,
) -> Result<(usize, usize)> {
    let n = definition.names;
    let types = definition
        .document()
        .descendants_named(definition.entity(), n.generated_type);

    let mut replaced = 0;
    for generated in &types {
        for (id_name, label) in [(n.type_id, "TypeId"), (n.value_id, "ValueId")] {
            let doc = definition.document_mut();
            match doc.first_child_named(*generated, id_name) {
                Some(node) => {
                    doc.set_text(node, &ids.next_id().to_string())?;
                    replaced += 1;
                }
                None => warn!(
                    "{}: generated type '{}' has no {}, skipping it",
                    doc.path().display(),
                    doc.attribute(*generated, n.name_attr).unwrap_or_default(),
                    label
                ),
            }
        }
    }
    Ok((types.len(), replaced))
}

fn regenerate_child_ids<G: IdGenerator>(
    definition: &mut EntityDefinition,
    id_map: &mut IdMap,
    ids: &mut G,
) -> usize {
    let uuid_attr = definition.names.uuid;
    let children: Vec<_> = definition
        .document()
        .descendant_elements(definition.entity())
        .into_iter()
        .filter_map(|node| {
            let old = definition.document().attribute(node, uuid_attr)?;
            Some((node, old))
        })
        .collect();

    let doc = definition.document_mut();
    for (node, old) in &children {
        let new = id_map.replace(old, ids);
        doc.set_attribute(*node, uuid_attr, &new.to_string());
    }
    children.len()
}
