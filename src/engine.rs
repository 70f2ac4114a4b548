//! Single-pass resolution of the key against the mapping table.
//!
//! Matching is unanchored: a pattern matches wherever it occurs inside the
//! key. A table entry that needs full-key semantics carries its own
//! `^`/`$` anchors.

use crate::error::Error;
use crate::model::{Config, Mode};

/// Resolve the configured key to its mapped value.
///
/// The table is scanned in declared order and every matching rule
/// overwrites the candidate, so the last matching rule wins. This lets a
/// later, more specific rule override an earlier, broader one. When no
/// rule matches, the configured mode decides between the original key, the
/// default value, and a hard failure.
pub fn resolve(config: &Config) -> Result<String, Error> {
    if config.allow_empty_map && config.table.is_empty() {
        return fallback(config);
    }

    let mut result = None;
    for rule in &config.table {
        if rule.pattern.is_match(&config.key) {
            result = Some(rule.value.as_str());
        }
    }

    match result {
        Some(value) => Ok(value.to_owned()),
        None => fallback(config),
    }
}

fn fallback(config: &Config) -> Result<String, Error> {
    match config.mode {
        Mode::FallbackToOriginal => Ok(config.key.clone()),
        Mode::FallbackToDefault => Ok(config.default_value.clone()),
        // Unreachable through validation; a hand-built configuration
        // degrades to the no-match failure instead of panicking.
        Mode::Strict => Err(Error::NoMatch {
            key: config.key.clone(),
        }),
    }
}
