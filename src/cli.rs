//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::commands;

/// Catalog Clone - Copy a catalog inside a 1C configuration dump under a new name
#[derive(Parser, Debug)]
#[command(name = "catalog-clone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: commands::clone::CloneArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level, self.args.verbose);
        let output = catalog_clone::output::OutputConfig::from_env_and_flag(&self.color);
        commands::clone::execute(self.args, &output)
    }
}

/// `warn` by default, `debug` with `--verbose`, `--log-level` above both.
/// `RUST_LOG` is applied last.
fn init_logging(log_level: Option<LevelFilter>, verbose: bool) {
    let level = log_level.unwrap_or(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}
