//! `rules` subcommand: show the parsed rule list.
use anyhow::{Context as _, Result};

use crate::cli::RulesOpts;
use crate::commands::migrate::resolve_endpoint;
use crate::config;
use crate::logging::Logger;
use crate::rules::{PlaceholderContext, Rule, parse_rules};

/// Run the rules command: print the rule list a migration would use.
///
/// # Errors
///
/// Returns an error if the rule file exists but cannot be read.
pub fn run(opts: &RulesOpts, log: &Logger) -> Result<()> {
    let path = config::resolve_rule_file(opts.rules.as_deref())?;
    let ctx = preview_context(opts)?;
    for (key, value) in ctx.iter() {
        log.debug(&format!("${{{key}}} = {value:?}"));
    }

    log.stage(&format!("Rules from {}", path.display()));
    if !path.exists() {
        log.warn("rule file not found, a migration would copy nothing");
    }
    let rules = parse_rules(&path, &ctx)?;
    log.info(&format!("{} rules", rules.len()));
    println!("{}", render(&rules));
    Ok(())
}

/// Placeholder values for the preview, using the same version folders a
/// `migrate` with these arguments would use.
///
/// # Errors
///
/// Returns an error if `--from` or `--to` is a pack root whose version
/// cannot be determined.
pub fn preview_context(opts: &RulesOpts) -> Result<PlaceholderContext> {
    let old_root = opts
        .from
        .as_deref()
        .map(|p| resolve_endpoint(p, opts.from_version.as_deref(), false))
        .transpose()
        .context("resolving --from")?;
    let new_root = opts
        .to
        .as_deref()
        .map(|p| resolve_endpoint(p, opts.to_version.as_deref(), true))
        .transpose()
        .context("resolving --to")?;
    Ok(PlaceholderContext::from_roots(
        old_root.as_deref(),
        new_root.as_deref(),
    ))
}

/// One line per rule, in evaluation order.
#[must_use]
pub fn render(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "(no rules)".to_string();
    }
    rules
        .iter()
        .map(|r| {
            let kind = if r.is_exclude { "exclude" } else { "include" };
            let scope = if r.is_directory() { "dir " } else { "file" };
            format!("{kind} {scope} {}", r.pattern)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
