//! The [`Log`] trait shared by the command layer and the migration worker.

/// Abstraction over logging backends.
///
/// The migration worker only sees `Arc<dyn Log>`, so it can log from its own
/// thread without knowing whether output reaches a console, a file, or a
/// test capture.  Implementations must never panic or block on I/O errors.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
