//! Migration rules: parsing, placeholder expansion, and matching.
//!
//! A rule file is a flat list of glob patterns.  Later lines take precedence
//! over earlier ones, a leading `!` turns a line into an exclusion, and a
//! trailing `/` makes the pattern cover a whole directory.
//!
//! ```text
//! # copy every save, but not the backups
//! saves/
//! !saves/backup/          # handled separately
//! config\options.txt
//! logs/${NEW_VERSION_NAME}.log
//! ```

mod matcher;
mod parser;
mod placeholder;

use std::fmt;

pub use matcher::{RuleMatcher, should_copy};
pub use parser::{parse_rules, parse_rules_from_str, read_rule_file};
pub use placeholder::{
    NEW_VERSION_NAME, NEW_VERSION_PATH, OLD_VERSION_NAME, OLD_VERSION_PATH, PlaceholderContext,
};

/// One parsed line of a rule file.
///
/// # Examples
///
/// ```
/// use data_migration_cli::rules::Rule;
///
/// let rule = Rule::exclude("saves/backup/");
/// assert!(rule.is_exclude);
/// assert!(rule.is_directory());
/// assert_eq!(rule.to_string(), "!saves/backup/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Glob pattern with `/` separators and placeholders already expanded.
    pub pattern: String,
    /// `true` for `!pattern` lines.
    pub is_exclude: bool,
}

impl Rule {
    /// An include rule for `pattern`.
    #[must_use]
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_exclude: false,
        }
    }

    /// An exclude rule for `pattern`.
    #[must_use]
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            is_exclude: true,
        }
    }

    /// Whether the pattern names a directory (ends with `/`).
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.pattern.ends_with('/')
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exclude {
            write!(f, "!{}", self.pattern)
        } else {
            f.write_str(&self.pattern)
        }
    }
}
