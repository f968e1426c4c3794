//! Top-level subcommand handlers.

pub mod migrate;
pub mod rules;
pub mod versions;
