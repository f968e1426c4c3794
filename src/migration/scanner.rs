//! Recursive enumeration of the files a rule list selects.
use std::path::Path;

use walkdir::WalkDir;

use crate::error::MigrationError;
use crate::logging::Log;
use crate::rules::RuleMatcher;

/// List every file under `root` that `matcher` accepts.
///
/// Paths are relative to `root` and joined with `/`.  Entries within a
/// directory are visited in file-name order, so the result is deterministic.
/// Directories are never returned.  Symlinks are not followed: a link to a
/// directory is skipped, a link to anything else is treated as a file.
///
/// Unreadable subdirectories and names that are not valid UTF-8 are logged
/// and skipped.
///
/// # Errors
///
/// Returns [`MigrationError::Scan`] if `root` itself cannot be read.
pub fn scan(
    root: &Path,
    matcher: &RuleMatcher,
    log: &dyn Log,
) -> Result<Vec<String>, MigrationError> {
    let mut selected = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(MigrationError::Scan {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                log.warn(&format!("skipping unreadable entry: {e}"));
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir()) {
            continue;
        }

        let Some(relative) = relative_key(root, entry.path()) else {
            log.warn(&format!(
                "skipping path that is not valid UTF-8: {}",
                entry.path().display()
            ));
            continue;
        };

        if matcher.should_copy(&relative) {
            selected.push(relative);
        }
    }

    Ok(selected)
}

/// `/`-joined form of `path` relative to `root`.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    parts.map(|p| p.join("/"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;
    use crate::logging::CaptureLog;
    use crate::rules::Rule;

    fn tree(files: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for f in files {
            let p = tmp.path().join(f);
            fs::create_dir_all(p.parent().unwrap()).unwrap();
            fs::write(p, f).unwrap();
        }
        tmp
    }

    fn run(root: &Path, rules: &[Rule]) -> Vec<String> {
        scan(root, &RuleMatcher::new(rules), &CaptureLog::default()).unwrap()
    }

    #[test]
    fn selects_matching_files_only() {
        let tmp = tree(&["saves/level.dat", "saves/w/r.mca", "mods/a.jar", "options.txt"]);
        let got = run(tmp.path(), &[Rule::include("saves/"), Rule::include("options.txt")]);
        assert_eq!(got, vec!["options.txt", "saves/level.dat", "saves/w/r.mca"]);
    }

    #[test]
    fn empty_rules_select_nothing() {
        let tmp = tree(&["a.txt", "b/c.txt"]);
        assert!(run(tmp.path(), &[]).is_empty());
    }

    #[test]
    fn directories_are_not_yielded() {
        let tmp = tree(&["saves/level.dat"]);
        fs::create_dir_all(tmp.path().join("empty_dir")).unwrap();
        let got = run(tmp.path(), &[Rule::include("*")]);
        assert_eq!(got, vec!["saves/level.dat"]);
    }

    #[test]
    fn order_is_stable_across_runs() {
        let tmp = tree(&["z.txt", "a.txt", "m/b.txt", "m/a.txt"]);
        let first = run(tmp.path(), &[Rule::include("*")]);
        let second = run(tmp.path(), &[Rule::include("*")]);
        assert_eq!(first, second);
        assert_eq!(first, vec!["a.txt", "m/a.txt", "m/b.txt", "z.txt"]);
    }

    #[test]
    fn missing_root_is_a_scan_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan(
            &tmp.path().join("gone"),
            &RuleMatcher::new(&[]),
            &CaptureLog::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::Scan { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let tmp = tree(&["real/a.txt"]);
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();
        let got = run(tmp.path(), &[Rule::include("*")]);
        assert_eq!(got, vec!["real/a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_listed() {
        let tmp = tree(&["real.txt"]);
        std::os::unix::fs::symlink(tmp.path().join("real.txt"), tmp.path().join("alias.txt"))
            .unwrap();
        let got = run(tmp.path(), &[Rule::include("*.txt")]);
        assert_eq!(got, vec!["alias.txt", "real.txt"]);
    }

    #[test]
    fn relative_key_uses_forward_slashes() {
        let root = Path::new("root");
        assert_eq!(
            relative_key(root, &root.join("a").join("b.txt")).as_deref(),
            Some("a/b.txt")
        );
        assert_eq!(relative_key(root, Path::new("elsewhere/x")), None);
    }
}
