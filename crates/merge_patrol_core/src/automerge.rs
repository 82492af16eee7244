//! The per-pull-request auto-merge decision.

use github_client::models::PullRequest;
use tracing::debug;

#[cfg(test)]
#[path = "automerge_tests.rs"]
mod tests;

/// The outcome of evaluating one pull request for auto-merge.
///
/// Every branch is a distinct variant so the orchestrator can log each
/// outcome separately; none of the skip variants is an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoMergeDecision {
    /// The author is not in the actor allow-list.
    SkipAuthor,
    /// Auto-merge is already enabled; enabling again would be a duplicate
    /// command.
    AlreadyEnabled,
    /// The repository's default branch is not protected strongly enough.
    BranchUnsafe,
    /// Auto-merge should be enabled on this pull request.
    Enable,
}

/// Decides whether auto-merge should be enabled on a pull request.
///
/// The decision depends only on the pull request's author and current
/// auto-merge state, the precomputed branch-safety verdict, and the actor
/// allow-list. Check-suite processing is independent of this outcome: a
/// skipped pull request still gets its failed workflows re-run.
pub fn evaluate_auto_merge(
    pull_request: &PullRequest,
    branch_is_safe: bool,
    actors: &[String],
) -> AutoMergeDecision {
    if !actors.iter().any(|actor| actor == &pull_request.author_login) {
        debug!(
            author = %pull_request.author_login,
            number = pull_request.number,
            "Author is not allow-listed for auto-merge"
        );
        return AutoMergeDecision::SkipAuthor;
    }

    if pull_request.auto_merge_enabled() {
        debug!(
            number = pull_request.number,
            "Auto-merge is already enabled"
        );
        return AutoMergeDecision::AlreadyEnabled;
    }

    if !branch_is_safe {
        return AutoMergeDecision::BranchUnsafe;
    }

    AutoMergeDecision::Enable
}
