//! `${NAME}` substitution for rule patterns.
//!
//! The context is built once per job from the two installation roots and
//! never changes afterwards.  Only the four keys below are known; any other
//! token is passed through untouched so rule files can mention placeholders
//! that a newer tool version will understand.

use std::collections::BTreeMap;
use std::path::Path;

/// Folder name of the source installation.
pub const OLD_VERSION_NAME: &str = "OLD_VERSION_NAME";
/// Folder name of the destination installation.
pub const NEW_VERSION_NAME: &str = "NEW_VERSION_NAME";
/// Source installation path, verbatim.
pub const OLD_VERSION_PATH: &str = "OLD_VERSION_PATH";
/// Destination installation path, verbatim.
pub const NEW_VERSION_PATH: &str = "NEW_VERSION_PATH";

/// Fixed placeholder values derived from the source and destination roots.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use data_migration_cli::rules::PlaceholderContext;
///
/// let ctx = PlaceholderContext::from_roots(
///     Some(Path::new("/games/pack/.minecraft/versions/1.20.1")),
///     Some(Path::new("/games/pack/.minecraft/versions/1.21.4")),
/// );
/// assert_eq!(ctx.expand("logs/${NEW_VERSION_NAME}.log"), "logs/1.21.4.log");
/// assert_eq!(ctx.expand("${UNKNOWN}"), "${UNKNOWN}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceholderContext {
    values: BTreeMap<&'static str, String>,
}

impl PlaceholderContext {
    /// Build the context from the two roots; an absent root yields empty values.
    #[must_use]
    pub fn from_roots(old_root: Option<&Path>, new_root: Option<&Path>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(OLD_VERSION_NAME, folder_name(old_root));
        values.insert(NEW_VERSION_NAME, folder_name(new_root));
        values.insert(OLD_VERSION_PATH, verbatim(old_root));
        values.insert(NEW_VERSION_PATH, verbatim(new_root));
        Self { values }
    }

    /// Look up the value of a single placeholder key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Replace every `${KEY}` token whose key is known.
    ///
    /// Scans left to right in a single pass: substituted text is never
    /// re-scanned, `${}` and unterminated `${` are copied as-is, and a token
    /// whose key is unknown is copied including its braces.
    #[must_use]
    pub fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            let (before, token) = rest.split_at(start);
            out.push_str(before);
            let body = token.strip_prefix("${").unwrap_or(token);

            let Some(end) = body.find('}') else {
                out.push_str(token);
                return out;
            };
            let (key, tail) = body.split_at(end);
            if key.is_empty() {
                out.push_str("${");
                rest = body;
                continue;
            }

            match self.get(key) {
                Some(value) => out.push_str(value),
                None => {
                    out.push_str("${");
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = tail.strip_prefix('}').unwrap_or(tail);
        }

        out.push_str(rest);
        out
    }
}

fn folder_name(root: Option<&Path>) -> String {
    root.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn verbatim(root: Option<&Path>) -> String {
    root.map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}
