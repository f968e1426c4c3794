//! Last-match-wins copy decision over an ordered rule list.
//!
//! Patterns use shell-style wildcards over the whole root-relative path,
//! so `*` and `?` also match `/`.  A pattern ending in `/` is a directory
//! rule: it matches the entry named by the pattern and anything below it.

use std::borrow::Cow;

use globset::{GlobBuilder, GlobMatcher};

use super::Rule;

/// Pre-compiled form of an ordered rule list.
///
/// Globs are built once per job; evaluation order and results are the same
/// as calling [`should_copy`] with the original rules.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    rules: Vec<CompiledRule>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    /// Alternative globs; the rule matches if any of them does.  Empty when
    /// the pattern is not a valid glob, so the rule never matches.
    globs: Vec<GlobMatcher>,
    is_exclude: bool,
}

impl RuleMatcher {
    /// Compile `rules`, keeping their order.
    #[must_use]
    pub fn new(rules: &[Rule]) -> Self {
        Self {
            rules: rules.iter().map(compile_rule).collect(),
        }
    }

    /// Number of compiled rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether the file at `relative_path` is copied.
    ///
    /// Starts from `false` and walks every rule in order; each matching rule
    /// overwrites the decision, so the last matching rule wins.
    #[must_use]
    pub fn should_copy(&self, relative_path: &str) -> bool {
        let mut decision = false;
        for rule in &self.rules {
            if rule.globs.iter().any(|g| g.is_match(relative_path)) {
                decision = !rule.is_exclude;
            }
        }
        decision
    }
}

/// Decide whether `relative_path` is copied under `rules`.
///
/// Convenience wrapper that compiles the rules on every call; prefer
/// [`RuleMatcher`] when evaluating many paths.
///
/// # Examples
///
/// ```
/// use data_migration_cli::rules::{Rule, should_copy};
///
/// let rules = [Rule::include("saves/"), Rule::exclude("saves/secret.txt")];
/// assert!(should_copy("saves/level.dat", &rules));
/// assert!(!should_copy("saves/secret.txt", &rules));
/// assert!(!should_copy("mods/a.jar", &rules));
/// ```
#[must_use]
pub fn should_copy(relative_path: &str, rules: &[Rule]) -> bool {
    RuleMatcher::new(rules).should_copy(relative_path)
}

fn compile_rule(rule: &Rule) -> CompiledRule {
    let globs = if rule.is_directory() {
        let dir = rule.pattern.trim_end_matches('/');
        [dir.to_string(), format!("{dir}/*")]
            .iter()
            .filter_map(|p| compile_glob(p))
            .collect()
    } else {
        compile_glob(&rule.pattern).into_iter().collect()
    };
    CompiledRule {
        globs,
        is_exclude: rule.is_exclude,
    }
}

/// Build a matcher with `fnmatch`-like semantics: separators are ordinary
/// characters, backslash is not an escape, and case folding follows the
/// platform's filesystem convention.
fn compile_glob(pattern: &str) -> Option<GlobMatcher> {
    GlobBuilder::new(&translate_pattern(pattern))
        .literal_separator(false)
        .backslash_escape(false)
        .case_insensitive(cfg!(windows))
        .build()
        .ok()
        .map(|g| g.compile_matcher())
}

/// Rewrite a rule pattern into globset syntax with plain wildcard meaning.
///
/// - runs of `*` collapse to one `*`, so `**` is never a recursive wildcard
///   that can match zero directories;
/// - `{` and `}` become single-char classes, so there is no alternation;
/// - only `[!...]` negates; a leading `^` in a class is a literal member.
///
/// An unclosed `[` is passed through and fails to compile.
fn translate_pattern(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}', '[']) && !pattern.contains("**") {
        return Cow::Borrowed(pattern);
    }

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;
    while let Some(&ch) = chars.get(i) {
        match ch {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => {
                if let Some(end) = class_end(&chars, i)
                    && let Some(members) = chars.get(i + 1..end)
                {
                    push_class(&mut out, members);
                    i = end;
                } else {
                    out.push('[');
                }
            }
            _ => out.push(ch),
        }
        i += 1;
    }
    Cow::Owned(out)
}

/// Index of the `]` closing the class opened at `open`.
///
/// A `]` directly after `[` or `[!` is a member, not the terminator.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars
        .get(j..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

fn push_class(out: &mut String, members: &[char]) {
    match members.split_first() {
        Some(('^', [])) => out.push('^'),
        Some(('^', rest)) => {
            // Move the `^` off the front; keep a trailing `-` literal by
            // putting it first instead.
            out.push('[');
            let rest = match rest.split_last() {
                Some(('-', init)) => {
                    out.push('-');
                    init
                }
                _ => rest,
            };
            out.extend(rest);
            out.push_str("^]");
        }
        _ => {
            out.push('[');
            out.extend(members);
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rules_never_copy() {
        for path in ["saves/level.dat", "options.txt", "a/b/c/d"] {
            assert!(!should_copy(path, &[]));
        }
    }

    #[test]
    fn directory_rule_matches_contents() {
        let rules = [Rule::include("saves/")];
        assert!(should_copy("saves/level.dat", &rules));
        assert!(should_copy("saves/world/region/r.0.0.mca", &rules));
        assert!(!should_copy("mods/a.jar", &rules));
        assert!(!should_copy("savesX/level.dat", &rules));
    }

    #[test]
    fn directory_rule_matches_entry_with_same_name() {
        assert!(should_copy("saves", &[Rule::include("saves/")]));
    }

    #[test]
    fn wildcard_directory_rule_spans_segments() {
        let rules = [Rule::include("*IAS*/")];
        assert!(should_copy("AutoIAS/config.txt", &rules));
        assert!(should_copy("MyIASStuff/sub/a.txt", &rules));
        assert!(!should_copy("Other/mods.txt", &rules));
    }

    #[test]
    fn last_match_wins() {
        let include = [Rule::include("saves/")];
        assert!(should_copy("saves/level.dat", &include));

        let then_exclude = [Rule::include("saves/"), Rule::exclude("saves/")];
        assert!(!should_copy("saves/level.dat", &then_exclude));

        let then_include = [
            Rule::include("saves/"),
            Rule::exclude("saves/"),
            Rule::include("saves/"),
        ];
        assert!(should_copy("saves/level.dat", &then_include));
    }

    #[test]
    fn later_exclude_only_affects_its_own_matches() {
        let rules = [Rule::include("saves/"), Rule::exclude("saves/secret.txt")];
        assert!(should_copy("saves/level.dat", &rules));
        assert!(!should_copy("saves/secret.txt", &rules));
    }

    #[test]
    fn non_matching_rules_leave_decision_alone() {
        let rules = [Rule::include("saves/"), Rule::exclude("mods/")];
        assert!(should_copy("saves/level.dat", &rules));
    }

    #[test]
    fn file_rule_star_crosses_separators() {
        let rules = [Rule::include("*.txt")];
        assert!(should_copy("options.txt", &rules));
        assert!(should_copy("config/deep/options.txt", &rules));
        assert!(!should_copy("options.txt.bak", &rules));
    }

    #[test]
    fn question_mark_and_classes() {
        assert!(should_copy("log1.txt", &[Rule::include("log?.txt")]));
        assert!(!should_copy("log12.txt", &[Rule::include("log?.txt")]));
        assert!(should_copy("b.jar", &[Rule::include("[abc].jar")]));
        assert!(!should_copy("d.jar", &[Rule::include("[abc].jar")]));
        assert!(should_copy("d.jar", &[Rule::include("[!abc].jar")]));
    }

    #[test]
    fn braces_are_literal() {
        let rules = [Rule::include("keep/${UNKNOWN}.txt")];
        assert!(should_copy("keep/${UNKNOWN}.txt", &rules));
        assert!(!should_copy("keep/$UNKNOWN.txt", &rules));
        assert!(!should_copy("a.txt", &[Rule::include("{a,b}.txt")]));
    }

    #[test]
    fn malformed_glob_never_matches() {
        let rules = [Rule::include("saves/"), Rule::exclude("saves/[oops")];
        assert!(should_copy("saves/[oops", &rules));
    }

    #[cfg(not(windows))]
    #[test]
    fn matching_is_case_sensitive_off_windows() {
        assert!(!should_copy("Saves/level.dat", &[Rule::include("saves/")]));
    }

    #[test]
    fn matcher_keeps_every_rule() {
        assert!(RuleMatcher::new(&[]).is_empty());
        let matcher = RuleMatcher::new(&[Rule::include("saves/"), Rule::exclude("[oops")]);
        assert_eq!(matcher.len(), 2);
        assert!(!matcher.is_empty());
    }

    #[test]
    fn decision_is_deterministic() {
        let matcher = RuleMatcher::new(&[Rule::include("*"), Rule::exclude("mods/")]);
        for _ in 0..3 {
            assert!(matcher.should_copy("saves/a"));
            assert!(!matcher.should_copy("mods/a.jar"));
        }
    }

    #[test]
    fn double_star_is_two_plain_stars() {
        let rules = [Rule::include("**/config.txt")];
        assert!(should_copy("mods/config.txt", &rules));
        assert!(should_copy("a/b/config.txt", &rules));
        assert!(!should_copy("config.txt", &rules));

        let rules = [Rule::include("a/**/b")];
        assert!(should_copy("a/x/b", &rules));
        assert!(should_copy("a/x/y/b", &rules));
        assert!(!should_copy("a/b", &rules));
    }

    #[test]
    fn caret_in_class_is_literal() {
        let rules = [Rule::include("[^a]b")];
        assert!(should_copy("^b", &rules));
        assert!(should_copy("ab", &rules));
        assert!(!should_copy("cb", &rules));

        assert!(should_copy("^", &[Rule::include("[^]")]));
        assert!(should_copy("-", &[Rule::include("[^-]")]));
        assert!(!should_copy("x", &[Rule::include("[^-]")]));
    }

    #[test]
    fn translate_pattern_rewrites() {
        assert_eq!(translate_pattern("a{b}"), "a[{]b[}]");
        assert_eq!(translate_pattern("[{]x"), "[{]x");
        assert_eq!(translate_pattern("[]{]{"), "[]{][{]");
        assert_eq!(translate_pattern("a/**/b***"), "a/*/b*");
        assert_eq!(translate_pattern("[**]"), "[**]");
        assert_eq!(translate_pattern("[^ab]"), "[ab^]");
        assert_eq!(translate_pattern("[^a-]"), "[-a^]");
        assert_eq!(translate_pattern("[!^a]"), "[!^a]");
        assert_eq!(translate_pattern("[!]a]"), "[!]a]");
        assert_eq!(translate_pattern("x[oops"), "x[oops");
        assert!(matches!(translate_pattern("plain*"), Cow::Borrowed("plain*")));
    }
}
