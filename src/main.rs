//! `data-migration` binary.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use data_migration_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Migrate(opts) => {
            let plan = commands::migrate::plan(&opts)?;
            let log_file = (!opts.no_log_file).then(|| logging::log_file_path(&plan.destination));
            logging::init_subscriber(args.verbose, log_file.as_deref());
            let log = Arc::new(logging::Logger::new(log_file));
            commands::migrate::run(&plan, opts.dry_run, &log)
        }
        cli::Command::Rules(opts) => {
            logging::init_subscriber(args.verbose, None);
            commands::rules::run(&opts, &logging::Logger::new(None))
        }
        cli::Command::Versions(opts) => {
            logging::init_subscriber(args.verbose, None);
            commands::versions::run(&opts, &logging::Logger::new(None))
        }
        cli::Command::Version => {
            let version =
                option_env!("DATA_MIGRATION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("data-migration {version}");
            Ok(())
        }
    }
}
