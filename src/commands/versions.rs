//! `versions` subcommand: list the versions of a pack.
use anyhow::{Result, bail};

use crate::cli::VersionsOpts;
use crate::logging::Logger;
use crate::versions::{InstallLocation, resolve_install};

/// Run the versions command.
///
/// # Errors
///
/// Returns an error if the path is not part of a pack with versions.
pub fn run(opts: &VersionsOpts, log: &Logger) -> Result<()> {
    let Some(install) = resolve_install(&opts.root) else {
        bail!(
            "{} is not a modpack folder with versions",
            opts.root.display()
        );
    };
    log.stage(&format!("Versions in {}", install.root.display()));
    println!("{}", render(&install));
    Ok(())
}

/// One line per version; the newest and the selected one are marked.
#[must_use]
pub fn render(install: &InstallLocation) -> String {
    let newest = install.newest();
    install
        .versions
        .iter()
        .map(|v| {
            let mut line = v.clone();
            if newest == Some(v.as_str()) {
                line.push_str(" (newest)");
            }
            if install.selected.as_deref() == Some(v.as_str()) {
                line.push_str(" (selected)");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
