//! The branch-safety verdict behind every auto-merge decision.
//!
//! Auto-merge hands the final merge to GitHub, so it is only safe when the
//! target branch's protection rule forces the merge to wait for reviews and
//! passing status checks. Anything less and enabling auto-merge would merge
//! unreviewed or unverified code.

use github_client::models::BranchProtectionRule;
use tracing::debug;

#[cfg(test)]
#[path = "protection_tests.rs"]
mod tests;

/// Returns whether the default branch is protected strongly enough for
/// auto-merge to be enabled on pull requests targeting it.
///
/// Rules are scanned in order and only a rule whose pattern is exactly the
/// default branch name is considered; the first such rule is authoritative
/// and later duplicates are ignored. When no rule matches, the branch is
/// treated as unprotected and the verdict is unsafe.
///
/// A matching rule is safe only when all of the following hold:
/// - at least one approving review is required,
/// - status checks are required,
/// - the branch must be up to date before merging (strict checks),
/// - approving reviews are required,
/// - the set of required status check contexts is non-empty.
pub fn auto_merge_is_safe(rules: &[BranchProtectionRule], default_branch: &str) -> bool {
    for rule in rules {
        if rule.pattern != default_branch {
            debug!(
                pattern = %rule.pattern,
                default_branch = default_branch,
                "Skipping rule for non-default branch pattern"
            );
            continue;
        }

        return rule_is_safe(rule);
    }

    debug!(
        default_branch = default_branch,
        "No protection rule found for the default branch"
    );

    false
}

fn rule_is_safe(rule: &BranchProtectionRule) -> bool {
    let review_count_ok = rule
        .required_approving_review_count
        .is_some_and(|count| count >= 1);

    let safe = review_count_ok
        && rule.requires_status_checks
        && rule.requires_strict_status_checks
        && rule.requires_approving_reviews
        && !rule.required_status_checks.is_empty();

    debug!(
        pattern = %rule.pattern,
        review_count_ok,
        requires_status_checks = rule.requires_status_checks,
        requires_strict_status_checks = rule.requires_strict_status_checks,
        requires_approving_reviews = rule.requires_approving_reviews,
        required_context_count = rule.required_status_checks.len(),
        safe,
        "Evaluated branch protection rule"
    );

    safe
}
