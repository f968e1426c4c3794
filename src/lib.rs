//! Rule-driven data migration between modpack game versions.
//!
//! Copies saves, settings and other user data from one version folder of a
//! modpack to another.  Which files move is decided by a plain-text rule
//! file of ordered glob patterns in which the last matching line wins.
//!
//! The public API is organised into four layers:
//!
//! - **[`rules`]**: parse rule files, expand `${...}` placeholders, match paths
//! - **[`migration`]**: scan a source tree and copy the selected files on a worker thread
//! - **[`versions`]**: find version folders inside a pack install
//! - **[`commands`]**: top-level subcommand orchestration (`migrate`, `rules`, `versions`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod migration;
pub mod rules;
pub mod versions;
