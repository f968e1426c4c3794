//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::utils::{format_local_timestamp, strip_ansi};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "data_migration::stage";
/// Target used for dry-run action lines.
pub(super) const DRY_RUN_TARGET: &str = "data_migration::dry_run";

/// Environment variable holding an optional console filter directive.
pub const LOG_FILTER_ENV: &str = "DATA_MIGRATION_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends events to a migration log.
///
/// Each line reads `<local time> - <LEVEL> - <message>` with ANSI codes
/// removed.  The file is opened in append mode so earlier runs into the same
/// destination are preserved; every run starts with a header block.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Create the parent directory of `path`, open it for appending, write the
    /// run header, and return a layer writing to it.
    ///
    /// Returns `None` if the directory or the file cannot be created; the
    /// migration then continues with console output only.
    pub(super) fn new(path: &Path) -> Option<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()?;
        let version = option_env!("DATA_MIGRATION_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(60);
        write!(
            file,
            "{rule}\nData Migration {version} started {}\nLog file: {}\n{rule}\n",
            format_local_timestamp(),
            path.display(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

/// Level label used in the log file.
const fn file_level_name(level: tracing::Level) -> &'static str {
    match level {
        tracing::Level::ERROR => "ERROR",
        tracing::Level::WARN => "WARNING",
        tracing::Level::INFO => "INFO",
        tracing::Level::DEBUG | tracing::Level::TRACE => "DEBUG",
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = file_level_name(*metadata.level());

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = strip_ansi(&extractor.message);
        let ts = format_local_timestamp();

        let line = match metadata.target() {
            STAGE_TARGET => format!("{ts} - {level} - ==> {msg}"),
            DRY_RUN_TARGET => format!("{ts} - {level} - [dry run] {msg}"),
            _ => format!("{ts} - {level} - {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for the migration console.
struct MigrationFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for MigrationFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let msg = &extractor.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// The console layer shows `info` and above (`debug` with `verbose`) unless
/// `DATA_MIGRATION_LOG` holds a filter directive.  When `log_file` is given,
/// every event down to `debug` is also appended there.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_FILTER_ENV)
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(MigrationFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = log_file
        .and_then(FileLayer::new)
        .map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn file_layer_creates_missing_log_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("run.log");
        assert!(FileLayer::new(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn file_layer_writes_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.log");
        FileLayer::new(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("===="));
        assert!(lines[1].starts_with("Data Migration "));
        assert!(lines[2].starts_with("Log file: "));
        assert!(lines[3].starts_with("===="));
    }

    #[test]
    fn file_layer_appends_across_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.log");
        fs::write(&path, "earlier run\n").unwrap();
        FileLayer::new(&path).unwrap();
        FileLayer::new(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert_eq!(contents.matches("Data Migration ").count(), 2);
    }

    #[test]
    fn file_layer_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();
        assert!(FileLayer::new(&blocker.join("run.log")).is_none());
    }

    #[test]
    fn file_level_names() {
        assert_eq!(file_level_name(tracing::Level::WARN), "WARNING");
        assert_eq!(file_level_name(tracing::Level::TRACE), "DEBUG");
        assert_eq!(file_level_name(tracing::Level::ERROR), "ERROR");
    }
}
