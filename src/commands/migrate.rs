//! `migrate` subcommand: resolve the two version folders and run a job.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use crate::cli::MigrateOpts;
use crate::config;
use crate::error::MigrationError;
use crate::logging::{Log, Logger};
use crate::migration::{MigrationEvent, MigrationJob};
use crate::versions::{resolve_install, version_dir};

/// Concrete folders and rule file for one `migrate` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Version folder to copy from.
    pub source: PathBuf,
    /// Version folder to copy into.
    pub destination: PathBuf,
    /// Rule file selecting what to copy.
    pub rule_file: PathBuf,
}

/// Resolve the command-line arguments into a [`MigrationPlan`].
///
/// # Errors
///
/// Returns an error if a version cannot be determined, the destination
/// default (the working directory) is not a pack, or both sides name the
/// same directory.
pub fn plan(opts: &MigrateOpts) -> Result<MigrationPlan> {
    let source = resolve_endpoint(&opts.from, opts.from_version.as_deref(), false)
        .context("resolving --from")?;

    let to = opts.to.clone().map_or_else(default_destination, Ok)?;
    let destination =
        resolve_endpoint(&to, opts.to_version.as_deref(), true).context("resolving --to")?;

    ensure_distinct(&source, &destination)?;
    let rule_file = config::resolve_rule_file(opts.rules.as_deref())?;

    Ok(MigrationPlan {
        source,
        destination,
        rule_file,
    })
}

/// The working directory, which must be part of a pack.
fn default_destination() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("determine working directory")?;
    if resolve_install(&cwd).is_none() {
        bail!(
            "current directory is not a modpack ({}); pass --to",
            cwd.display()
        );
    }
    Ok(cwd)
}

/// Turn a user-supplied folder into a version folder.
///
/// A path inside a pack is mapped to `<root>/.minecraft/versions/<v>`, where
/// `<v>` is, in order: `version`, the version the path already points at,
/// or the newest version when `newest_by_default` is set.  Any other path is
/// used as-is.
///
/// # Errors
///
/// Returns an error if the pack has no matching version, no version can be
/// chosen, or `version` is given for a path that is not a pack.
pub fn resolve_endpoint(
    path: &Path,
    version: Option<&str>,
    newest_by_default: bool,
) -> Result<PathBuf> {
    let Some(install) = resolve_install(path) else {
        if let Some(v) = version {
            bail!(
                "{} is not a modpack folder; cannot select version {v}",
                path.display()
            );
        }
        return Ok(path.to_path_buf());
    };

    let chosen = match (version, install.selected.as_deref()) {
        (Some(v), _) | (None, Some(v)) => v,
        (None, None) if newest_by_default => install
            .newest()
            .with_context(|| format!("no versions in {}", install.root.display()))?,
        (None, None) => bail!(
            "{} has no version selected (available: {}); choose one with a version flag",
            install.root.display(),
            install.versions.join(", ")
        ),
    };

    if !install.has_version(chosen) {
        bail!(
            "version {chosen} not found in {} (available: {})",
            install.root.display(),
            install.versions.join(", ")
        );
    }
    Ok(version_dir(&install.root, chosen))
}

/// Refuse to migrate a folder onto itself.
fn ensure_distinct(source: &Path, destination: &Path) -> Result<(), MigrationError> {
    let same = match (dunce::canonicalize(source), dunce::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => source == destination,
    };
    if same {
        return Err(MigrationError::SameDirectory(destination.to_path_buf()));
    }
    Ok(())
}

/// Run the migrate command.
///
/// The job runs on a worker thread while this thread renders progress.
/// Ctrl-C asks the job to stop after the file it is copying.
///
/// # Errors
///
/// Returns an error if the job fails (missing source, unreadable rule file,
/// unreadable source tree) or the worker cannot be started.
pub fn run(plan: &MigrationPlan, dry_run: bool, log: &Arc<Logger>) -> Result<()> {
    log.stage(&format!(
        "Migrating {} -> {}",
        plan.source.display(),
        plan.destination.display()
    ));
    log.info(&format!("rules: {}", plan.rule_file.display()));
    if let Some(path) = log.log_path() {
        log.debug(&format!("log file: {}", path.display()));
    }

    let job = MigrationJob::new(
        &plan.source,
        &plan.destination,
        &plan.rule_file,
        Arc::clone(log) as Arc<dyn Log>,
    )
    .with_dry_run(dry_run);
    let handle = job.spawn()?;

    let cancel = handle.cancel_signal();
    let interrupt_log = Arc::clone(log);
    if let Err(e) = ctrlc::set_handler(move || {
        interrupt_log.warn("interrupted, stopping after the current file");
        cancel.cancel();
    }) {
        log.debug(&format!("Ctrl-C handler unavailable: {e}"));
    }

    for event in handle.events() {
        match event {
            MigrationEvent::Progress { percent, message } => log.progress(percent, &message),
            MigrationEvent::Finished { .. } => log.finish_progress(),
        }
    }

    let report = handle.join()?;
    if let Some(path) = log.log_path() {
        log.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
    }
    if report.failed > 0 {
        bail!("{} of {} files could not be copied", report.failed, report.total);
    }
    Ok(())
}
