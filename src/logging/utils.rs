//! Utility functions for log paths, ANSI stripping, widths, and timestamps.
use std::path::{Path, PathBuf};

/// File name of the persistent migration log.
pub const LOG_FILE_NAME: &str = "data-migration.log";

/// Strip ANSI escape sequences from a string.
///
/// Handles SGR sequences (ending in `m`) and other CSI sequences (ending
/// in any letter in the `@`..`~` range).
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if let Some(next) = chars.next()
                && next == '['
            {
                for inner in chars.by_ref() {
                    if ('@'..='~').contains(&inner) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Return the terminal width in columns.
///
/// Asks the terminal first, then the `COLUMNS` environment variable, and
/// finally falls back to 80.
pub(super) fn terminal_columns() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size()
        && w > 0
    {
        return usize::from(w);
    }
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(80)
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
///
/// The middle of the text is dropped so both the leading directory and the
/// file name stay visible.
pub(super) fn elide_middle(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let keep = max_chars - 1;
    let head = keep / 2;
    let tail = keep - head;
    let mut out: String = text.chars().take(head).collect();
    out.push('…');
    out.extend(text.chars().skip(len - tail));
    out
}

/// Location of the persistent log for a migration into `destination`:
/// `<destination>/logs/data-migration.log`.
#[must_use]
pub fn log_file_path(destination: &Path) -> PathBuf {
    destination.join("logs").join(LOG_FILE_NAME)
}

/// Format the current local time as `YYYY-MM-DD HH:MM:SS,mmm`.
pub(super) fn format_local_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S,%3f")
        .to_string()
}
