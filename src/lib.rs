//! Reeldupe library crate
//!
//! Exposes the duplicate-folder pipeline (scan -> identify -> group ->
//! resolve) for programmatic use alongside the CLI binary. The pipeline
//! stages are pure functions over explicit inputs; only `cleaner` touches
//! the filesystem destructively, and only after the full plan is computed.

pub mod cleaner;
pub mod cli;
pub mod config;
pub mod grouper;
pub mod identity;
pub mod output;
pub mod resolver;
pub mod scanner;
pub mod scorer;
pub mod utils;
