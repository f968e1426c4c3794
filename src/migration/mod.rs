//! Migration job: scanning a source tree and copying the selected files.
//!
//! A [`MigrationJob`] runs either on the caller's thread via
//! [`MigrationJob::run`] or on its own worker thread via
//! [`MigrationJob::spawn`].  Progress and the single terminal outcome are
//! delivered through an [`EventSink`]; the spawned variant uses an
//! `mpsc` channel.

mod cancel;
mod copy;
mod events;
mod job;
mod scanner;

pub use cancel::CancelSignal;
pub use copy::{copy_file_with_metadata, ensure_parent_dir, migrate_file};
pub use events::{EventSink, MigrationEvent, NullSink};
pub use job::{JobState, MigrationHandle, MigrationJob, MigrationReport};
pub use scanner::scan;
