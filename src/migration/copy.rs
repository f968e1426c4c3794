//! Single-file copy helpers.
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use filetime::{FileTime, set_file_times};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Copy `src` over `dst`, then carry over access/modification times and
/// permission bits.
///
/// Symlinks in `src` are followed, so the link target's contents are copied.
/// Times are applied before permissions so a read-only source does not
/// block the timestamp update.
///
/// # Errors
///
/// Returns an error if the copy or any metadata update fails.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst)
        .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;

    let meta = fs::metadata(src).with_context(|| format!("stat {}", src.display()))?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    set_file_times(dst, atime, mtime)
        .with_context(|| format!("set times: {}", dst.display()))?;
    fs::set_permissions(dst, meta.permissions())
        .with_context(|| format!("set permissions: {}", dst.display()))?;
    Ok(())
}

/// Copy `relative` from `source_root` to the same place under `dest_root`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the copy
/// fails.
pub fn migrate_file(source_root: &Path, dest_root: &Path, relative: &str) -> Result<()> {
    let src = source_root.join(relative);
    let dst = dest_root.join(relative);
    ensure_parent_dir(&dst)?;
    copy_file_with_metadata(&src, &dst)
}
