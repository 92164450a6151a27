//! Clone command implementation
//!
//! Runs the clone pipeline against a configuration dump and prints a summary:
//! 1. Validation of names and input files
//! 2. Removal of stale target artifacts
//! 3. Rewriting of the definition and auxiliary files
//! 4. Registry updates
//! 5. Staged write of all outputs

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use catalog_clone::config::CloneRequest;
use catalog_clone::defaults::{DEFAULT_SOURCE, DEFAULT_TARGET};
use catalog_clone::ident::RandomIds;
use catalog_clone::output::{emoji, OutputConfig};
use catalog_clone::phases::{execute_clone, CloneReport};

/// Arguments for the clone command
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Root of the configuration dump (contains Catalogs/, Configuration.xml
    /// and ConfigDumpInfo.xml)
    #[arg(
        long,
        value_name = "DIR",
        env = "CATALOG_CLONE_CONFIG_PATH",
        default_value = "."
    )]
    pub config_path: PathBuf,

    /// Catalog to copy
    #[arg(long, value_name = "NAME", env = "CATALOG_CLONE_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Name of the new catalog
    #[arg(long, value_name = "NAME", env = "CATALOG_CLONE_TARGET", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Show detailed progress information
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the clone command
pub fn execute(args: CloneArgs, output: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();
    let request = CloneRequest::new(&args.config_path, &args.source, &args.target)
        .with_dry_run(args.dry_run);

    if !args.quiet {
        println!(
            "{} Cloning {} into {}",
            emoji(output, "📋", "[CLONE]"),
            output.entity(request.kind.compound_name(&args.source)),
            output.entity(request.kind.compound_name(&args.target))
        );
        if args.dry_run {
            println!(
                "{} DRY RUN MODE - No changes will be made",
                emoji(output, "🔎", "[DRY RUN]")
            );
        }
        println!();
    }

    let report = match execute_clone(&request, &mut RandomIds) {
        Ok(report) => report,
        Err(e) => {
            if !args.quiet {
                println!("{} Clone failed", emoji(output, "❌", "[FAIL]"));
                println!();
            }
            return Err(e.into());
        }
    };

    if !args.quiet {
        print_summary(&report, output, args.verbose);
        println!(
            "{} {} in {:.2}s",
            emoji(output, "✅", "[OK]"),
            if report.dry_run {
                "Dry run finished"
            } else {
                "Cloned successfully"
            },
            start_time.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn print_summary(report: &CloneReport, output: &OutputConfig, verbose: bool) {
    let verb = |done: &'static str, planned: &'static str| {
        if report.dry_run {
            planned
        } else {
            done
        }
    };

    if !report.stale.is_empty() {
        println!(
            "   {} stale artifact(s) of the previous run",
            verb("Removed", "Would remove")
        );
        if verbose {
            for path in report.stale.paths() {
                println!("     {}", output.detail(path.display()));
            }
        }
    }

    println!("   New root id: {}", output.detail(report.root_id));
    println!(
        "   {} identifier(s) regenerated, {} reference(s) renamed",
        report.regenerated_ids, report.renamed_references
    );
    if let Some(files) = report.auxiliary_files {
        println!(
            "   {} auxiliary file(s) copied, {} rewritten",
            files, report.auxiliary_rewritten
        );
    }
    println!(
        "   Configuration.xml: record placed {}{}",
        report.configuration.placement,
        replaced(report.configuration.removed)
    );
    println!(
        "   ConfigDumpInfo.xml: record with {} nested record(s) placed {}{}",
        report.dump_info.nested_records,
        report.dump_info.placement,
        replaced(report.dump_info.removed)
    );

    if verbose {
        for path in &report.written {
            println!("   Wrote {}", output.detail(path.display()));
        }
    }
}

fn replaced(removed: usize) -> String {
    match removed {
        0 => String::new(),
        1 => ", replacing the previous one".to_string(),
        n => format!(", replacing {} duplicates", n),
    }
}
