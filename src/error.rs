//! Domain-specific error types for the migration engine.
//!
//! Library modules return [`MigrationError`] for failures that end a job;
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! Per-file copy failures are deliberately *not* represented here: they are
//! absorbed by the copy loop, logged, and counted in the job report.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a migration job before or during scanning.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// The source root does not exist at job start.
    #[error("source path does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The rule file exists but could not be read.
    #[error("cannot read rule file {}: {source}", path.display())]
    RuleFileUnreadable {
        /// Path of the rule file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Walking the source tree failed.
    #[error("failed to scan {}: {message}", path.display())]
    Scan {
        /// Path at which traversal failed.
        path: PathBuf,
        /// Human-readable reason.
        message: String,
    },

    /// Source and destination resolve to the same directory.
    #[error("source and destination are the same directory: {}", .0.display())]
    SameDirectory(PathBuf),

    /// [`MigrationJob::run`](crate::migration::MigrationJob::run) was called
    /// on a job that already reached a terminal state.
    #[error("migration job has already run")]
    AlreadyRun,
}
