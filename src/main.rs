//! # Catalog Clone CLI
//!
//! This is the binary entry point for the `catalog-clone` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output style.
//! - Returning errors to the runtime, which prints them to stderr and exits
//!   with status 1.
//!
//! The clone itself is implemented in the `catalog_clone` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
