//! Events published by a running job.
use std::sync::mpsc;

/// One notification from a migration job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationEvent {
    /// Completion percentage (0..=100) and a short status line.
    Progress {
        /// Share of selected files processed so far.
        percent: u8,
        /// Current activity, e.g. `migrating: saves/level.dat`.
        message: String,
    },
    /// Terminal outcome; emitted exactly once per job.
    Finished {
        /// `false` only when a fatal error aborted the job.
        success: bool,
        /// Summary or error text.
        message: String,
    },
}

/// Receiver of job events.
///
/// Implementations must not block for long: events are delivered from the
/// worker thread between file copies.
pub trait EventSink {
    /// Report progress.
    fn progress(&self, percent: u8, message: &str);
    /// Report the terminal outcome.
    fn finished(&self, success: bool, message: &str);
}

/// Channel sink used by [`MigrationJob::spawn`](super::MigrationJob::spawn).
///
/// A dropped receiver is not an error; the job keeps copying.
impl EventSink for mpsc::Sender<MigrationEvent> {
    fn progress(&self, percent: u8, message: &str) {
        self.send(MigrationEvent::Progress {
            percent,
            message: message.to_string(),
        })
        .ok();
    }

    fn finished(&self, success: bool, message: &str) {
        self.send(MigrationEvent::Finished {
            success,
            message: message.to_string(),
        })
        .ok();
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn progress(&self, _percent: u8, _message: &str) {}
    fn finished(&self, _success: bool, _message: &str) {}
}
