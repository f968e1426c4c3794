//! Discovery of game versions inside a modpack install.
//!
//! A pack keeps one folder per game version under
//! `<root>/.minecraft/versions/<version>`.  Migrations copy data between two
//! such version folders.
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the game data folder inside a pack root.
pub const GAME_DIR: &str = ".minecraft";
/// Name of the folder holding one directory per version.
pub const VERSIONS_DIR: &str = "versions";

/// A pack root recognized from a user-selected path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLocation {
    /// Directory containing `.minecraft`.
    pub root: PathBuf,
    /// Version named by the selected path, if it pointed at a version folder.
    pub selected: Option<String>,
    /// Every version folder in the pack, sorted.
    pub versions: Vec<String>,
}

impl InstallLocation {
    /// Whether `version` exists in this pack.
    #[must_use]
    pub fn has_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    /// The newest version in the pack.
    #[must_use]
    pub fn newest(&self) -> Option<&str> {
        newest_version(&self.versions)
    }
}

/// `<root>/.minecraft/versions/<version>`.
#[must_use]
pub fn version_dir(root: &Path, version: &str) -> PathBuf {
    root.join(GAME_DIR).join(VERSIONS_DIR).join(version)
}

/// Sorted names of the version folders under `<root>/.minecraft/versions`.
///
/// Returns an empty list when the folder is missing or unreadable; plain
/// files are ignored.
#[must_use]
pub fn list_versions(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root.join(GAME_DIR).join(VERSIONS_DIR)) else {
        return Vec::new();
    };
    let mut versions: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    versions.sort();
    versions
}

/// Numeric sort key: split on `.` and `-`, digits-only parts as integers,
/// anything else as `0`.
fn version_key(version: &str) -> Vec<u64> {
    version
        .split(['.', '-'])
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().unwrap_or(u64::MAX)
            } else {
                0
            }
        })
        .collect()
}

/// Pick the highest version by numeric comparison.
///
/// On ties the earliest entry wins.
///
/// # Examples
///
/// ```
/// use data_migration_cli::versions::newest_version;
///
/// let versions = ["1.9.4", "1.20.1", "1.21.4-forge", "1.21"];
/// assert_eq!(newest_version(&versions), Some("1.21.4-forge"));
/// assert_eq!(newest_version::<&str>(&[]), None);
/// ```
#[must_use]
pub fn newest_version<S: AsRef<str>>(versions: &[S]) -> Option<&str> {
    let mut best: Option<(&str, Vec<u64>)> = None;
    for v in versions {
        let v = v.as_ref();
        let key = version_key(v);
        let better = best
            .as_ref()
            .is_none_or(|(_, best_key)| key.cmp(best_key) == Ordering::Greater);
        if better {
            best = Some((v, key));
        }
    }
    best.map(|(v, _)| v)
}

/// Recognize `path` as part of a pack install.
///
/// Accepts a version folder (`…/.minecraft/versions/<v>`), a pack root (a
/// directory containing `.minecraft`), or the `.minecraft` folder itself.
/// Returns `None` when none of these apply or the pack has no versions.
#[must_use]
pub fn resolve_install(path: &Path) -> Option<InstallLocation> {
    let (root, selected) = if is_version_folder(path) {
        let root = path.parent()?.parent()?.parent()?.to_path_buf();
        let selected = path.file_name()?.to_str()?.to_string();
        (root, Some(selected))
    } else if path.join(GAME_DIR).exists() {
        (path.to_path_buf(), None)
    } else if path.file_name().is_some_and(|n| n == GAME_DIR) {
        (path.parent()?.to_path_buf(), None)
    } else {
        return None;
    };

    let versions = list_versions(&root);
    if versions.is_empty() {
        return None;
    }
    Some(InstallLocation {
        root,
        selected,
        versions,
    })
}

fn is_version_folder(path: &Path) -> bool {
    let parent = path.parent();
    let grandparent = parent.and_then(Path::parent);
    parent.and_then(Path::file_name).is_some_and(|n| n == VERSIONS_DIR)
        && grandparent
            .and_then(Path::file_name)
            .is_some_and(|n| n == GAME_DIR)
}
