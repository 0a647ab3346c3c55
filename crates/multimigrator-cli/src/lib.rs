//! `multimigrator` command-line utilities.
//!
//! This crate powers the `multimigrator` binary (see `crates/multimigrator-cli/src/main.rs`).
//! The public surface is intentionally small: most logic lives in internal modules and is
//! dispatched from [`run`].

mod cli;
mod run;

pub use run::run;
