// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed modpack with two version folders and
// a fluent builder so each integration test can lay out source files and a
// rule file without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use data_migration_cli::logging::{Log, Logger};
use data_migration_cli::migration::MigrationJob;
use data_migration_cli::versions::version_dir;

/// Version folder migrated from.
pub const OLD_VERSION: &str = "1.20.1";
/// Version folder migrated into.
pub const NEW_VERSION: &str = "1.21.4";

/// An isolated modpack backed by a [`tempfile::TempDir`].
///
/// Layout: `<root>/.minecraft/versions/{1.20.1,1.21.4}` plus a rule file at
/// `<root>/data_migration_rules.conf`.
pub struct MigrationTestContext {
    /// Temporary pack root.
    pub root: tempfile::TempDir,
}

impl MigrationTestContext {
    /// Create a pack with empty source and destination versions and no rule
    /// file.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(version_dir(root.path(), OLD_VERSION)).expect("create source");
        fs::create_dir_all(version_dir(root.path(), NEW_VERSION)).expect("create destination");
        Self { root }
    }

    /// Pack root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Source version folder.
    pub fn source(&self) -> PathBuf {
        version_dir(self.root.path(), OLD_VERSION)
    }

    /// Destination version folder.
    pub fn dest(&self) -> PathBuf {
        version_dir(self.root.path(), NEW_VERSION)
    }

    /// Rule file path (may not exist).
    pub fn rules(&self) -> PathBuf {
        self.root.path().join("data_migration_rules.conf")
    }

    /// A job over this pack with a logger that has no subscriber attached.
    pub fn job(&self) -> MigrationJob {
        MigrationJob::new(
            self.source(),
            self.dest(),
            self.rules(),
            Arc::new(Logger::new(None)) as Arc<dyn Log>,
        )
    }

    /// Read a destination file relative to the destination folder.
    pub fn read_dest(&self, relative: &str) -> String {
        fs::read_to_string(self.dest().join(relative)).expect("read destination file")
    }

    /// Every file under the destination, `/`-joined and sorted.
    pub fn dest_files(&self) -> Vec<String> {
        let dest = self.dest();
        let mut files: Vec<String> = walkdir::WalkDir::new(&dest)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(&dest)
                    .expect("under destination")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        files.sort();
        files
    }
}

/// Fluent builder for [`MigrationTestContext`].
pub struct TestContextBuilder {
    ctx: MigrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new pack.
    pub fn new() -> Self {
        Self {
            ctx: MigrationTestContext::new(),
        }
    }

    /// Write `content` to `relative` inside the source version.
    pub fn with_source_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.source().join(relative);
        fs::create_dir_all(path.parent().expect("has parent")).expect("create source parent");
        fs::write(&path, content).expect("write source file");
        self
    }

    /// Write the rule file.
    pub fn with_rules(self, content: &str) -> Self {
        fs::write(self.ctx.rules(), content).expect("write rule file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> MigrationTestContext {
        self.ctx
    }
}
