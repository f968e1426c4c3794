//! A single migration run: validate, parse rules, scan, copy.
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;

use anyhow::{Context as _, anyhow};

use super::cancel::CancelSignal;
use super::copy::migrate_file;
use super::events::{EventSink, MigrationEvent};
use super::scanner::scan;
use crate::error::MigrationError;
use crate::logging::Log;
use crate::rules::{PlaceholderContext, RuleMatcher, parse_rules_from_str, read_rule_file};

/// Lifecycle of a [`MigrationJob`].
///
/// `Idle → Scanning → Copying → {Succeeded, Failed}`.  A job with no
/// selected files goes straight from `Scanning` to `Succeeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not started.
    Idle,
    /// Validating inputs, parsing rules and walking the source tree.
    Scanning,
    /// Copying selected files.
    Copying,
    /// Finished; a success event was sent.
    Succeeded,
    /// Aborted by a fatal error; a failure event was sent.
    Failed,
}

/// Counters describing a finished job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Files selected by the rules.
    pub total: usize,
    /// Files copied (or, in a dry run, listed).
    pub copied: usize,
    /// Files whose copy failed.
    pub failed: usize,
    /// The job stopped early on request.
    pub cancelled: bool,
    /// Nothing was written.
    pub dry_run: bool,
}

impl MigrationReport {
    /// Files attempted so far.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.copied + self.failed
    }

    /// One-line outcome shown to the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use data_migration_cli::migration::MigrationReport;
    ///
    /// let report = MigrationReport { total: 3, copied: 3, ..MigrationReport::default() };
    /// assert_eq!(report.summary(), "migration succeeded: 3 files copied");
    ///
    /// let report = MigrationReport { total: 3, copied: 1, cancelled: true, ..report };
    /// assert_eq!(report.summary(), "migration stopped early: 1 of 3 files processed");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        if self.total == 0 {
            "nothing to migrate".to_string()
        } else if self.cancelled {
            format!(
                "migration stopped early: {} of {} files processed",
                self.processed(),
                self.total
            )
        } else if self.dry_run {
            format!("dry run: {} files would be migrated", self.copied)
        } else if self.failed > 0 {
            format!(
                "migration finished: {} of {} files copied, {} failed",
                self.copied, self.total, self.failed
            )
        } else {
            format!("migration succeeded: {} files copied", self.copied)
        }
    }
}

/// Completion percentage after `completed` of `total` files.
fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    u8::try_from(completed.saturating_mul(100) / total).unwrap_or(100)
}

/// One migration from a source root to a destination root.
///
/// Build the job, then either [`run`](Self::run) it on the current thread or
/// [`spawn`](Self::spawn) it onto a worker thread and read events from the
/// returned handle.
pub struct MigrationJob {
    source: PathBuf,
    destination: PathBuf,
    rule_file: PathBuf,
    dry_run: bool,
    cancel: CancelSignal,
    state: JobState,
    log: Arc<dyn Log>,
}

impl std::fmt::Debug for MigrationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationJob")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("rule_file", &self.rule_file)
            .field("dry_run", &self.dry_run)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl MigrationJob {
    /// Create an idle job.
    #[must_use]
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        rule_file: impl Into<PathBuf>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            rule_file: rule_file.into(),
            dry_run: false,
            cancel: CancelSignal::new(),
            state: JobState::Idle,
            log,
        }
    }

    /// List the selected files instead of copying them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// A handle that stops the job before its next file.
    #[must_use]
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Run the job on the current thread.
    ///
    /// Progress goes to `sink` as it happens and exactly one terminal event
    /// is sent at the end.  Per-file copy failures are logged and counted
    /// but do not fail the job.  A cancelled job still finishes
    /// successfully; the report records that it stopped early.
    ///
    /// # Errors
    ///
    /// Returns an error, after sending a failed terminal event, if the
    /// source root is missing, the rule file is unreadable, or the source
    /// tree cannot be scanned.  Returns [`MigrationError::AlreadyRun`]
    /// without sending any event if the job already finished.
    pub fn run(&mut self, sink: &dyn EventSink) -> Result<MigrationReport, MigrationError> {
        if self.state != JobState::Idle {
            return Err(MigrationError::AlreadyRun);
        }

        match self.execute(sink) {
            Ok(report) => {
                self.state = JobState::Succeeded;
                let message = report.summary();
                self.log.info(&message);
                sink.finished(true, &message);
                Ok(report)
            }
            Err(e) => {
                self.state = JobState::Failed;
                let message = format!("migration failed: {e}");
                self.log.error(&message);
                sink.finished(false, &message);
                Err(e)
            }
        }
    }

    fn execute(&mut self, sink: &dyn EventSink) -> Result<MigrationReport, MigrationError> {
        self.log.info(&format!(
            "starting migration from [{}] to [{}]",
            self.source.display(),
            self.destination.display()
        ));

        if !self.source.exists() {
            return Err(MigrationError::SourceNotFound(self.source.clone()));
        }

        let ctx = PlaceholderContext::from_roots(Some(&self.source), Some(&self.destination));
        let rules = read_rule_file(&self.rule_file)?.map_or_else(
            || {
                self.log.warn(&format!(
                    "rule file not found, using empty rules: {}",
                    self.rule_file.display()
                ));
                Vec::new()
            },
            |content| parse_rules_from_str(&content, &ctx),
        );
        let matcher = RuleMatcher::new(&rules);
        self.log.info(&format!("loaded {} rules", matcher.len()));
        if matcher.is_empty() {
            self.log.debug("no rules, nothing will be selected");
        }

        self.state = JobState::Scanning;
        sink.progress(0, "scanning files...");
        let files = scan(&self.source, &matcher, self.log.as_ref())?;
        let total = files.len();
        self.log.info(&format!("found {total} files to migrate"));

        let mut report = MigrationReport {
            total,
            dry_run: self.dry_run,
            ..MigrationReport::default()
        };
        if total == 0 {
            return Ok(report);
        }

        self.state = JobState::Copying;
        for (idx, relative) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.log.warn(&format!(
                    "cancellation requested, stopping after {idx} of {total} files"
                ));
                report.cancelled = true;
                break;
            }

            if self.dry_run {
                self.log.dry_run(&format!("would copy {relative}"));
                report.copied += 1;
            } else {
                match migrate_file(&self.source, &self.destination, relative) {
                    Ok(()) => {
                        report.copied += 1;
                        self.log.info(&format!("copied: {relative}"));
                    }
                    Err(e) => {
                        report.failed += 1;
                        self.log.warn(&format!("failed to copy {relative}: {e:#}"));
                    }
                }
            }

            sink.progress(percent(idx + 1, total), &format!("migrating: {relative}"));
        }

        Ok(report)
    }

    /// Move the job onto a dedicated worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to create the thread.
    pub fn spawn(mut self) -> anyhow::Result<MigrationHandle> {
        let (tx, rx) = mpsc::channel();
        let cancel = self.cancel_signal();
        let thread = std::thread::Builder::new()
            .name("migration".to_string())
            .spawn(move || self.run(&tx))
            .context("spawn migration worker")?;
        Ok(MigrationHandle {
            events: rx,
            cancel,
            thread,
        })
    }
}

/// Caller side of a job started with [`MigrationJob::spawn`].
#[derive(Debug)]
pub struct MigrationHandle {
    events: mpsc::Receiver<MigrationEvent>,
    cancel: CancelSignal,
    thread: JoinHandle<Result<MigrationReport, MigrationError>>,
}

impl MigrationHandle {
    /// Ask the worker to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the worker's cancel flag (e.g. for a Ctrl-C handler).
    #[must_use]
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Event stream; ends once the worker has sent its terminal event and
    /// exited.
    #[must_use]
    pub const fn events(&self) -> &mpsc::Receiver<MigrationEvent> {
        &self.events
    }

    /// Wait for the worker and return its report.
    ///
    /// # Errors
    ///
    /// Returns the job's fatal error, or an error if the worker panicked.
    pub fn join(self) -> anyhow::Result<MigrationReport> {
        let result = self
            .thread
            .join()
            .map_err(|_| anyhow!("migration worker panicked"))?;
        Ok(result?)
    }
}
