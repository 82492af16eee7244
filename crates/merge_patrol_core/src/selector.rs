//! Prefix-based repository selection.

use tracing::debug;

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;

/// Selects the repositories whose name starts with one of the configured
/// prefixes.
///
/// The comparison is a literal, case-sensitive starts-with test; no glob or
/// regex interpretation. Input order is preserved and each repository is
/// emitted at most once, even when several prefixes match it. An empty prefix
/// list selects nothing.
pub fn select_repositories(names: &[String], prefixes: &[String]) -> Vec<String> {
    let mut selected = Vec::new();

    for name in names {
        for prefix in prefixes {
            if name.starts_with(prefix.as_str()) {
                selected.push(name.clone());
                break;
            }
        }
    }

    debug!(
        candidate_count = names.len(),
        selected_count = selected.len(),
        "Selected repositories by prefix"
    );

    selected
}
