//! # Models
//!
//! This module contains the data models used throughout the MergePatrol core.
//!
//! These models represent the entities the patrol run inspects: pull requests,
//! their check suites and workflow runs, and the branch protection rules of the
//! repositories they belong to. They are converted from the GraphQL wire types
//! in [`crate::graphql`] before crossing the crate boundary, so consumers never
//! see raw API shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The conclusion of a completed check suite.
///
/// Mirrors the GitHub GraphQL `CheckConclusionState` values this tool acts on.
/// A suite that has not finished yet has no conclusion and is represented as
/// `None` at the use sites, never as an empty-string sentinel.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckConclusion {
    /// All checks in the suite passed.
    Success,
    /// At least one check in the suite failed.
    Failure,
    /// The suite was cancelled before completion.
    Cancelled,
    /// The suite finished in a neutral state.
    Neutral,
    /// The suite was skipped entirely.
    Skipped,
    /// The suite exceeded its execution time limit.
    TimedOut,
    /// The suite requires a manual action before it can proceed.
    ActionRequired,
    /// The suite result is stale because the branch moved.
    Stale,
}

/// A single execution of a CI workflow.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WorkflowRun {
    /// The numeric database ID used by the REST workflow-run endpoints.
    pub database_id: u64,
    /// The name of the workflow this run belongs to.
    pub workflow_name: String,
}

/// A grouped CI result attached to one commit.
///
/// Suites created by external check apps carry no workflow run; those can be
/// observed but never re-run.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CheckSuite {
    /// The opaque GraphQL node ID of the suite.
    pub id: String,
    /// The conclusion of the suite, or `None` while it is still in progress.
    pub conclusion: Option<CheckConclusion>,
    /// The workflow run that produced this suite, if any.
    pub workflow_run: Option<WorkflowRun>,
}

/// An open pull request together with the check suites of its newest commit.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullRequest {
    /// The opaque GraphQL node ID, used to address mutations.
    pub id: String,
    /// The pull request number within its repository.
    pub number: u64,
    /// The pull request title.
    pub title: String,
    /// The HTML URL of the pull request.
    pub url: String,
    /// The login of the author. Empty when the authoring account is gone.
    pub author_login: String,
    /// When auto-merge was enabled on this pull request, or `None` if it has
    /// not been enabled.
    pub auto_merge_enabled_at: Option<DateTime<Utc>>,
    /// The check suites attached to the most recent commit (newest 100).
    pub check_suites: Vec<CheckSuite>,
}

impl PullRequest {
    /// Returns whether auto-merge has already been enabled on this pull
    /// request.
    pub fn auto_merge_enabled(&self) -> bool {
        self.auto_merge_enabled_at.is_some()
    }
}

/// Merge-safety requirements attached to a branch name pattern.
///
/// Only the rule whose pattern equals the configured default branch is
/// relevant to the patrol run; pattern globbing is never interpreted here.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BranchProtectionRule {
    /// The branch name pattern the rule applies to.
    pub pattern: String,
    /// Minimum number of approving reviews, or `None` when the API reports no
    /// review requirement at all.
    pub required_approving_review_count: Option<u32>,
    /// Whether status checks are required before merging.
    pub requires_status_checks: bool,
    /// Whether the branch must be up to date with its base before merging.
    pub requires_strict_status_checks: bool,
    /// Whether approving reviews are required before merging.
    pub requires_approving_reviews: bool,
    /// The status check contexts that must pass before merging.
    pub required_status_checks: Vec<String>,
}

/// The combined per-repository fetch result: open pull requests and branch
/// protection rules, retrieved in a single query.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepositorySnapshot {
    /// The open pull requests of the repository (newest 20).
    pub pull_requests: Vec<PullRequest>,
    /// The branch protection rules of the repository (newest 20).
    pub branch_protection_rules: Vec<BranchProtectionRule>,
}
