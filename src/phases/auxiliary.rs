//! Phase 3: Rewriting the Auxiliary Directory
//!
//! An entity may own a directory next to its definition
//! (`Catalogs/<Name>/`) with forms, modules and templates. The target gets a
//! full copy. XML and BSL files are renamed through the same scoped rewrite as
//! the definition, so `Справочники.Source` and `cfg:CatalogObject.Source`
//! follow the entity while a form title that merely equals the name does not.
//! Every `uuid="…"` attribute in them is replaced through the run's
//! [`IdMap`], so a form keeps the identity its registry record gets.
//! Other files are copied unchanged.

use std::borrow::Cow;
use std::path::Path;

use log::{debug, info, warn};
use regex::{Captures, Regex};

use crate::config::ConfigLayout;
use crate::error::Result;
use crate::filesystem::{File, MemoryFS};
use crate::ident::{IdGenerator, IdMap};
use crate::names::NameRewriter;

/// Extensions of files that get the scoped rewrite.
const TEXT_EXTENSIONS: &[&str] = &["xml", "bsl"];

const UUID_ATTRIBUTE: &str =
    r#"\buuid="([0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12})""#;

/// The target's auxiliary directory, prepared in memory.
#[derive(Debug, Clone)]
pub struct AuxiliaryTree {
    pub files: MemoryFS,
    /// Number of files whose content changed.
    pub rewritten: usize,
}

/// Copy the source's auxiliary directory in memory, rename references and
/// replace identifiers.
///
/// Returns `None` when the source has no auxiliary directory.
pub fn execute<G: IdGenerator>(
    layout: &ConfigLayout,
    names: &NameRewriter,
    id_map: &mut IdMap,
    ids: &mut G,
) -> Result<Option<AuxiliaryTree>> {
    let source_dir = layout.auxiliary_dir(names.source());
    if !source_dir.is_dir() {
        debug!("No auxiliary directory at {}", source_dir.display());
        return Ok(None);
    }

    let uuid_attribute = Regex::new(UUID_ATTRIBUTE)?;
    let source = MemoryFS::load_dir(&source_dir)?;
    let mut files = MemoryFS::new();
    let mut rewritten = 0;

    for (path, file) in source.files() {
        let mut copy = file.clone();
        if is_text_file(path) {
            match std::str::from_utf8(&file.content) {
                Ok(text) => {
                    let renamed = names.rewrite(text);
                    let new_text =
                        renew_identifiers(&renamed, &uuid_attribute, id_map, ids).into_owned();
                    if new_text != text {
                        debug!("Rewrote {}", path.display());
                        copy = File {
                            content: new_text.into_bytes(),
                            permissions: file.permissions,
                        };
                        rewritten += 1;
                    }
                }
                Err(_) => warn!(
                    "{} is not valid UTF-8, copying it unchanged",
                    source_dir.join(path).display()
                ),
            }
        }
        files.add_file(path, copy);
    }

    info!(
        "Prepared {} auxiliary file(s), {} rewritten",
        files.len(),
        rewritten
    );
    Ok(Some(AuxiliaryTree { files, rewritten }))
}

fn renew_identifiers<'a, G: IdGenerator>(
    text: &'a str,
    uuid_attribute: &Regex,
    id_map: &mut IdMap,
    ids: &mut G,
) -> Cow<'a, str> {
    uuid_attribute.replace_all(text, |caps: &Captures| {
        format!("uuid=\"{}\"", id_map.replace(&caps[1], ids))
    })
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
