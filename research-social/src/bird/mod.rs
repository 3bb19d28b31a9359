//! X/Twitter search through the `bird` CLI.
//!
//! The tool is invoked as `bird search <query> --json` and is expected to print a
//! single JSON document on stdout.
pub mod cli;

pub use cli::{BirdCli, BirdError, DEFAULT_BINARY};
