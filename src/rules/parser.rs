use std::path::Path;

use super::placeholder::PlaceholderContext;
use super::Rule;
use crate::error::MigrationError;

const BOM: char = '\u{feff}';

/// Read a rule file, returning `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`MigrationError::RuleFileUnreadable`] if the file exists but
/// cannot be read as UTF-8 text.
pub fn read_rule_file(path: &Path) -> Result<Option<String>, MigrationError> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|source| MigrationError::RuleFileUnreadable {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse the rule file at `path`.
///
/// A missing file yields an empty rule list.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn parse_rules(path: &Path, ctx: &PlaceholderContext) -> Result<Vec<Rule>, MigrationError> {
    Ok(read_rule_file(path)?
        .map(|content| parse_rules_from_str(&content, ctx))
        .unwrap_or_default())
}

/// Parse rule-file content.
///
/// A single leading byte-order mark is dropped. Rules are returned in file
/// order; nothing is deduplicated or validated.
///
/// # Examples
///
/// ```
/// use data_migration_cli::rules::{PlaceholderContext, Rule, parse_rules_from_str};
///
/// let ctx = PlaceholderContext::default();
/// let rules = parse_rules_from_str("\u{feff}# header\n\nsaves/  # note\n!mods\\*.jar\n", &ctx);
/// assert_eq!(rules, [Rule::include("saves/"), Rule::exclude("mods/*.jar")]);
/// ```
#[must_use]
pub fn parse_rules_from_str(content: &str, ctx: &PlaceholderContext) -> Vec<Rule> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    content
        .lines()
        .filter_map(|line| parse_line(line, ctx))
        .collect()
}

fn parse_line(line: &str, ctx: &PlaceholderContext) -> Option<Rule> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let line = strip_inline_comment(line).trim();
    if line.is_empty() {
        return None;
    }

    let (is_exclude, pattern) = line
        .strip_prefix('!')
        .map_or((false, line), |rest| (true, rest));

    let pattern = ctx.expand(pattern).replace('\\', "/");
    Some(Rule {
        pattern,
        is_exclude,
    })
}

/// Cut the line before the whitespace that precedes the first `#`.
///
/// A `#` at the very start or glued to the previous character (e.g.
/// `color#1`) is part of the pattern.
fn strip_inline_comment(line: &str) -> &str {
    let mut prev: Option<(usize, char)> = None;
    for (idx, ch) in line.char_indices() {
        if ch == '#'
            && let Some((prev_idx, prev_ch)) = prev
            && prev_ch.is_whitespace()
        {
            return line.split_at(prev_idx).0;
        }
        prev = Some((idx, ch));
    }
    line
}
