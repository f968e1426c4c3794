//! Locating the rule file.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// Default rule file name.
pub const RULE_FILE_NAME: &str = "data_migration_rules.conf";

/// Environment variable that overrides the rule file location.
pub const RULES_ENV: &str = "DATA_MIGRATION_RULES";

/// Resolve the rule file for this process.
///
/// Looks at, in order: `explicit`, the `DATA_MIGRATION_RULES` environment
/// variable, `data_migration_rules.conf` in the working directory, then the
/// same name next to the executable.  When nothing exists on disk the
/// working-directory path is returned, so a missing file degrades to an empty
/// rule list downstream.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined.
pub fn resolve_rule_file(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("determine working directory")?;
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    Ok(resolve_rule_file_in(
        explicit,
        std::env::var_os(RULES_ENV),
        &cwd,
        exe_dir.as_deref(),
    ))
}

/// Lookup behind [`resolve_rule_file`] with every input passed in.
#[must_use]
pub fn resolve_rule_file_in(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    cwd: &Path,
    exe_dir: Option<&Path>,
) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return PathBuf::from(value);
    }

    let cwd_path = cwd.join(RULE_FILE_NAME);
    if cwd_path.exists() {
        return cwd_path;
    }
    if let Some(dir) = exe_dir {
        let exe_path = dir.join(RULE_FILE_NAME);
        if exe_path.exists() {
            return exe_path;
        }
    }
    cwd_path
}
