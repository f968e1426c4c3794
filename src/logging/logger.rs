//! Console logger with an in-place progress line.
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::Log;
use super::utils::{elide_middle, terminal_columns};

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that forwards to [`tracing`] and owns the console progress line.
///
/// Every message first erases a visible progress line so log output and the
/// progress display never interleave on one row.  Writes to the persistent
/// log file happen in the [`FileLayer`](super::subscriber::FileLayer)
/// installed by [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
    /// Serializes console output between the worker and the UI thread.
    flush_lock: Mutex<()>,
    /// Whether a progress line is currently displayed.
    ///
    /// The line is always truncated to a single terminal row, so clearing it
    /// only needs a carriage return and an erase.
    progress_shown: Mutex<bool>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// `log_file` is only remembered for display; the file itself is opened
    /// by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            log_file,
            flush_lock: Mutex::new(()),
            progress_shown: Mutex::new(false),
        }
    }

    /// Return the log file path, if one is in use.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        self.emit(|| tracing::error!("{msg}"));
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.emit(|| tracing::warn!("{msg}"));
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        self.emit(|| tracing::info!(target: STAGE_TARGET, "{msg}"));
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        self.emit(|| tracing::info!("{msg}"));
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        self.emit(|| tracing::debug!("{msg}"));
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        self.emit(|| tracing::info!(target: DRY_RUN_TARGET, "{msg}"));
    }

    /// Replace the progress line with `percent` and `message`.
    ///
    /// The message is shortened in the middle so the line fits one row.
    pub fn progress(&self, percent: u8, message: &str) {
        let _guard = self.flush_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.clear_progress();
        self.draw_progress(percent, message);
    }

    /// Erase the progress line, if one is shown.
    pub fn finish_progress(&self) {
        let _guard = self.flush_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.clear_progress();
    }

    /// Whether a progress line is currently displayed.
    #[must_use]
    pub fn progress_visible(&self) -> bool {
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: impl FnOnce()) {
        let _guard = self.flush_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.clear_progress();
        event();
    }

    /// Must be called while holding `flush_lock`.
    fn clear_progress(&self) {
        let mut shown = self
            .progress_shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *shown {
            print!("\r\x1b[K");
            std::io::stdout().flush().ok();
            *shown = false;
        }
    }

    /// Must be called while holding `flush_lock`.
    fn draw_progress(&self, percent: u8, message: &str) {
        let prefix = format!("  [{percent:>3}%] ");
        let max_chars = terminal_columns().saturating_sub(prefix.chars().count() + 1);
        let text = elide_middle(message, max_chars);
        print!("{prefix}\x1b[2m{text}\x1b[0m");
        std::io::stdout().flush().ok();
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}
