//! The sequential patrol run.
//!
//! The orchestrator walks the selected repositories one at a time and applies
//! the auto-merge and retry policies to every open pull request. All pacing
//! lives in the client's throttle; everything here is strictly sequential so
//! the run stays deterministic and well under GitHub's rate limits.
//!
//! Failure handling is best-effort: a repository whose snapshot cannot be
//! fetched is skipped, a command that fails is logged and abandoned, and the
//! run carries on. Only a failure to list the organization's repositories is
//! fatal, because at that point nothing has been started yet.

use github_client::models::{CheckSuite, PullRequest};
use github_client::{Error, PatrolClient};
use tracing::{debug, error, info, warn};

use crate::automerge::{evaluate_auto_merge, AutoMergeDecision};
use crate::config::PatrolConfig;
use crate::protection::auto_merge_is_safe;
use crate::retry::{conclusion_is_retryable, retry_budget_exhausted};
use crate::selector::select_repositories;

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

/// Drives one patrol run against a [`PatrolClient`].
pub struct Orchestrator<'a, C: PatrolClient> {
    config: &'a PatrolConfig,
    client: &'a C,
}

impl<'a, C: PatrolClient> Orchestrator<'a, C> {
    /// Creates an orchestrator for the given configuration and client.
    pub fn new(config: &'a PatrolConfig, client: &'a C) -> Self {
        Self { config, client }
    }

    /// Runs one full patrol: discovery, selection, and per-repository
    /// processing.
    ///
    /// Returns an error only when the organization's repositories cannot be
    /// listed. Every later failure is contained to the repository or command
    /// it occurred in.
    pub async fn run(&self) -> Result<(), Error> {
        let names = self
            .client
            .list_repository_names(&self.config.owner)
            .await?;

        let selected = select_repositories(&names, &self.config.repo_prefixes);

        info!(
            owner = %self.config.owner,
            repository_count = names.len(),
            selected_count = selected.len(),
            dry_run = self.config.dry_run,
            "Starting patrol run"
        );

        for repository in &selected {
            if let Err(e) = self.patrol_repository(repository).await {
                error!(
                    repository = %repository,
                    error = %e,
                    "Failed to process repository, skipping"
                );
            }
        }

        info!(selected_count = selected.len(), "Patrol run finished");

        Ok(())
    }

    async fn patrol_repository(&self, repository: &str) -> Result<(), Error> {
        info!(repository = %repository, "Started processing repository");

        let snapshot = self
            .client
            .fetch_repository_snapshot(&self.config.owner, repository)
            .await?;

        // One verdict per repository; every pull request shares it.
        let branch_is_safe = auto_merge_is_safe(
            &snapshot.branch_protection_rules,
            &self.config.default_branch,
        );
        if !branch_is_safe {
            warn!(
                repository = %repository,
                default_branch = %self.config.default_branch,
                "Branch protection is not strict enough for auto-merge"
            );
        }

        for pull_request in &snapshot.pull_requests {
            self.patrol_pull_request(repository, pull_request, branch_is_safe)
                .await;
        }

        info!(repository = %repository, "Done processing repository");

        Ok(())
    }

    async fn patrol_pull_request(
        &self,
        repository: &str,
        pull_request: &PullRequest,
        branch_is_safe: bool,
    ) {
        info!(
            repository = %repository,
            pull_request_id = %pull_request.id,
            number = pull_request.number,
            author = %pull_request.author_login,
            title = %pull_request.title,
            url = %pull_request.url,
            "Processing pull request"
        );

        match evaluate_auto_merge(pull_request, branch_is_safe, &self.config.actors) {
            AutoMergeDecision::SkipAuthor => {
                debug!(
                    number = pull_request.number,
                    "Leaving pull request alone, author is not allow-listed"
                );
            }
            AutoMergeDecision::AlreadyEnabled => {
                debug!(
                    number = pull_request.number,
                    "Auto-merge is already enabled"
                );
            }
            AutoMergeDecision::BranchUnsafe => {
                // Already warned once at the repository level.
            }
            AutoMergeDecision::Enable => {
                self.enable_auto_merge(repository, pull_request).await;
            }
        }

        // The retry step runs for every pull request, whatever the
        // auto-merge decision was.
        for suite in &pull_request.check_suites {
            self.patrol_check_suite(repository, pull_request, suite).await;
        }
    }

    async fn enable_auto_merge(&self, repository: &str, pull_request: &PullRequest) {
        if self.config.dry_run {
            warn!(
                repository = %repository,
                number = pull_request.number,
                "Dry-run: would enable auto-merge on pull request"
            );
            return;
        }

        match self.client.enable_auto_merge(&pull_request.id).await {
            Ok(()) => {
                info!(
                    repository = %repository,
                    number = pull_request.number,
                    "Enabled auto-merge on pull request"
                );
            }
            Err(e) => {
                error!(
                    repository = %repository,
                    number = pull_request.number,
                    error = %e,
                    "Failed to enable auto-merge, continuing with next pull request"
                );
            }
        }
    }

    async fn patrol_check_suite(
        &self,
        repository: &str,
        pull_request: &PullRequest,
        suite: &CheckSuite,
    ) {
        if !conclusion_is_retryable(suite.conclusion) {
            debug!(
                suite_id = %suite.id,
                conclusion = ?suite.conclusion,
                "Check suite conclusion is not retryable"
            );
            return;
        }

        let run = match &suite.workflow_run {
            Some(run) => run,
            None => {
                debug!(
                    suite_id = %suite.id,
                    "Check suite has no workflow run and cannot be re-run"
                );
                return;
            }
        };

        debug!(
            suite_id = %suite.id,
            workflow = %run.workflow_name,
            run_id = run.database_id,
            "Check suite qualifies for a re-run, checking the attempt budget"
        );

        // The snapshot may be stale; the run itself is authoritative for the
        // attempt count.
        let attempts = match self
            .client
            .workflow_run_attempt(&self.config.owner, repository, run.database_id)
            .await
        {
            Ok(attempts) => attempts,
            Err(e) => {
                error!(
                    repository = %repository,
                    run_id = run.database_id,
                    error = %e,
                    "Failed to look up workflow run attempts, skipping suite"
                );
                return;
            }
        };

        info!(
            repository = %repository,
            workflow = %run.workflow_name,
            run_id = run.database_id,
            attempts,
            max_run_attempts = self.config.max_run_attempts,
            "Retrieved workflow run attempt count"
        );

        if retry_budget_exhausted(attempts, self.config.max_run_attempts) {
            warn!(
                repository = %repository,
                workflow = %run.workflow_name,
                run_id = run.database_id,
                attempts,
                "Re-run budget exhausted, leaving workflow run alone"
            );
            return;
        }

        if self.config.dry_run {
            warn!(
                repository = %repository,
                number = pull_request.number,
                workflow = %run.workflow_name,
                run_id = run.database_id,
                "Dry-run: would re-run workflow"
            );
            return;
        }

        match self
            .client
            .rerun_workflow(&self.config.owner, repository, run.database_id)
            .await
        {
            Ok(()) => {
                info!(
                    repository = %repository,
                    workflow = %run.workflow_name,
                    run_id = run.database_id,
                    "Requested workflow re-run"
                );
            }
            Err(e) => {
                error!(
                    repository = %repository,
                    run_id = run.database_id,
                    error = %e,
                    "Failed to re-run workflow, continuing with next suite"
                );
            }
        }
    }
}
