//! Orchestrator for a complete clone
//!
//! Runs the phases in order and collects what each of them did into a
//! [`CloneReport`]. Everything between validation and persisting happens in
//! memory, so a dry run simply stops before the first filesystem mutation.

use std::path::PathBuf;

use log::info;
use uuid::Uuid;

use super::cleanup::StaleArtifacts;
use super::persist::Output;
use super::{auxiliary, cleanup, persist, validate};
use crate::config::CloneRequest;
use crate::definition::EntityDefinition;
use crate::error::Result;
use crate::ident::{IdGenerator, IdMap};
use crate::lock::ConfigLock;
use crate::names::NameRewriter;
use crate::registry::{ConfigurationRegistry, DumpInfoRegistry, RegistryUpdate};
use crate::rewrite::rewrite_definition;

/// Summary of a clone run.
#[derive(Debug, Clone)]
pub struct CloneReport {
    pub source: String,
    pub target: String,
    /// Root identifier of the new entity.
    pub root_id: Uuid,
    /// Identifiers minted in the definition, the root included.
    pub regenerated_ids: usize,
    pub renamed_references: usize,
    pub generated_types: usize,
    pub configuration: RegistryUpdate,
    pub dump_info: RegistryUpdate,
    /// Files in the new auxiliary directory, if the source had one.
    pub auxiliary_files: Option<usize>,
    /// Auxiliary files whose content was rewritten.
    pub auxiliary_rewritten: usize,
    /// Artifacts of an earlier run that were (or, in a dry run, would be)
    /// removed.
    pub stale: StaleArtifacts,
    /// Final paths written, in commit order. Empty in a dry run.
    pub written: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Clone `request.source` into `request.target`.
///
/// 1. Validate names and inputs.
/// 2. Lock the tree and remove stale target artifacts.
/// 3. Rewrite the definition and the auxiliary directory.
/// 4. Update `Configuration.xml` and `ConfigDumpInfo.xml`.
/// 5. Stage all outputs and move them into place.
///
/// In a dry run, steps 2 and 5 only report what they would do.
pub fn execute_clone<G: IdGenerator>(request: &CloneRequest, ids: &mut G) -> Result<CloneReport> {
    let layout = request.layout();
    let kind = &request.kind;

    // Phase 1: Validation
    validate::execute(request)?;

    // Phase 2: Lock and remove stale target artifacts
    let _lock = if request.dry_run {
        None
    } else {
        Some(ConfigLock::acquire(&layout.lock_file())?)
    };
    let stale = if request.dry_run {
        cleanup::plan(&layout, &request.target)
    } else {
        cleanup::execute(&layout, &request.target)?
    };

    // Phase 3: Rewriting
    info!(
        "Cloning {} into {}",
        kind.compound_name(&request.source),
        kind.compound_name(&request.target)
    );
    let names = NameRewriter::new(kind, &request.source, &request.target)?;
    let mut definition = EntityDefinition::load(&layout.definition_file(&request.source), kind)?;
    let mut id_map = IdMap::new();
    let outcome = rewrite_definition(&mut definition, &names, &mut id_map, ids)?;
    let auxiliary = auxiliary::execute(&layout, &names, &mut id_map, ids)?;

    // Phase 4: Registries
    let mut configuration = ConfigurationRegistry::load(&layout.configuration_file())?;
    let configuration_update = configuration.update(kind, &request.target)?;
    info!(
        "Configuration registry: {} {}",
        kind.compound_name(&request.target),
        configuration_update.placement
    );

    let mut dump_info = DumpInfoRegistry::load(&layout.dump_info_file())?;
    let dump_info_update = dump_info.update(kind, &names, outcome.root_id, &mut id_map, ids)?;
    info!(
        "Dump registry: {} with {} nested record(s)",
        kind.compound_name(&request.target),
        dump_info_update.nested_records
    );

    // Phase 5: Persisting
    let auxiliary_files = auxiliary.as_ref().map(|tree| tree.files.len());
    let auxiliary_rewritten = auxiliary.as_ref().map_or(0, |tree| tree.rewritten);

    let mut outputs = vec![Output::file(
        layout.definition_file(&request.target),
        definition.document().to_xml_string()?,
    )];
    if let Some(tree) = auxiliary {
        outputs.push(Output::dir(layout.auxiliary_dir(&request.target), tree.files));
    }
    outputs.push(Output::file(
        layout.configuration_file(),
        configuration.document().to_xml_string()?,
    ));
    outputs.push(Output::file(
        layout.dump_info_file(),
        dump_info.document().to_xml_string()?,
    ));

    let written = if request.dry_run {
        info!("Dry run: {} output(s) not written", outputs.len());
        Vec::new()
    } else {
        persist::execute(&outputs)?
    };

    Ok(CloneReport {
        source: request.source.clone(),
        target: request.target.clone(),
        root_id: outcome.root_id,
        regenerated_ids: outcome.regenerated_ids,
        renamed_references: outcome.renamed_references,
        generated_types: outcome.generated_types,
        configuration: configuration_update,
        dump_info: dump_info_update,
        auxiliary_files,
        auxiliary_rewritten,
        stale,
        written,
        dry_run: request.dry_run,
    })
}
