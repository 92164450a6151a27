//! # CLI Command Implementations
//!
//! The tool has a single command. Like every command module it provides:
//! - an `Args` struct that defines the command's arguments and options,
//!   derived using `clap`;
//! - an `execute` function that takes the parsed `Args`, calls into the
//!   `catalog_clone` library, and prints a summary.

pub mod clone;
