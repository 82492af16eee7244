//! The workflow re-run predicates.

use github_client::models::CheckConclusion;

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

/// Returns whether a check suite conclusion qualifies for an automatic
/// re-run.
///
/// Only `Failure` and `Cancelled` do. A suite without a conclusion is still
/// in progress and must be left alone; every other conclusion is final and
/// re-running it would change nothing or waste CI capacity.
pub fn conclusion_is_retryable(conclusion: Option<CheckConclusion>) -> bool {
    matches!(
        conclusion,
        Some(CheckConclusion::Failure) | Some(CheckConclusion::Cancelled)
    )
}

/// Returns whether a workflow run has used up its re-run budget.
///
/// The attempt count comes from a fresh lookup against the run itself, not
/// from the snapshot, so restarts triggered elsewhere still count against
/// the cap.
pub fn retry_budget_exhausted(attempts: u32, cap: u32) -> bool {
    attempts >= cap
}
