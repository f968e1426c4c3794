//! Cooperative cancellation flag shared between a running job and its caller.
//!
//! The job only checks the flag at the top of each per-file iteration, so a
//! copy that is already in progress always completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheaply-clonable stop request.
///
/// Obtain one from [`MigrationJob::cancel_signal`](super::MigrationJob::cancel_signal)
/// and hand clones to whoever may need to stop the job (a Ctrl-C handler, a
/// UI thread).
#[derive(Debug, Clone)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a new signal in the "keep running" state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the job to stop before its next file.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_signal_is_not_cancelled() {
        assert!(!CancelSignal::new().is_cancelled());
    }

    #[test]
    fn cancel_sets_flag() {
        let sig = CancelSignal::new();
        sig.cancel();
        assert!(sig.is_cancelled());
    }

    #[test]
    fn clone_sees_same_state() {
        let sig = CancelSignal::new();
        let cloned = sig.clone();
        cloned.cancel();
        assert!(sig.is_cancelled());
    }

    #[test]
    fn visible_across_threads() {
        let sig = CancelSignal::new();
        let remote = sig.clone();
        std::thread::spawn(move || remote.cancel()).join().ok();
        assert!(sig.is_cancelled());
    }
}
