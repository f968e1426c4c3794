//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI entry point for the data migration tool.
#[derive(Parser, Debug)]
#[command(
    name = "data-migration",
    about = "Copy saves and settings between modpack game versions",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy files selected by the rule file from one version to another
    Migrate(MigrateOpts),
    /// Print the parsed rule list
    Rules(RulesOpts),
    /// List the versions of a pack
    Versions(VersionsOpts),
    /// Print version information
    Version,
}

/// Options for the `migrate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MigrateOpts {
    /// Source version folder, pack root, or `.minecraft` folder
    #[arg(long)]
    pub from: PathBuf,

    /// Destination version folder, pack root, or `.minecraft` folder
    /// [default: current directory]
    #[arg(long)]
    pub to: Option<PathBuf>,

    /// Source version when `--from` is a pack root
    #[arg(long)]
    pub from_version: Option<String>,

    /// Destination version when `--to` is a pack root [default: newest]
    #[arg(long)]
    pub to_version: Option<String>,

    /// Rule file to use instead of the default lookup
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// List the files that would be copied without writing anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Do not write `<destination>/logs/data-migration.log`
    #[arg(long)]
    pub no_log_file: bool,
}

/// Options for the `rules` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RulesOpts {
    /// Rule file to use instead of the default lookup
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Source folder used to expand `${OLD_VERSION_*}` placeholders
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Destination folder used to expand `${NEW_VERSION_*}` placeholders
    #[arg(long)]
    pub to: Option<PathBuf>,

    /// Source version when `--from` is a pack root
    #[arg(long, requires = "from")]
    pub from_version: Option<String>,

    /// Destination version when `--to` is a pack root [default: newest]
    #[arg(long, requires = "to")]
    pub to_version: Option<String>,
}

/// Options for the `versions` subcommand.
#[derive(Args, Debug, Clone)]
pub struct VersionsOpts {
    /// Pack root, `.minecraft` folder, or version folder
    pub root: PathBuf,
}
