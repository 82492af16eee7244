//! # GitHub Client
//!
//! This crate provides the GitHub API surface used by the MergePatrol run. It
//! wraps an authenticated [`octocrab::Octocrab`] instance behind the
//! [`PatrolClient`] trait, translating between the GraphQL/REST wire shapes
//! and the domain models in [`models`].
//!
//! All requests are issued sequentially and every call is followed by a fixed
//! [`throttle::Throttle`] pause, so a patrol run never bursts against GitHub's
//! secondary rate limits.
//!
//! ## Authentication
//!
//! The client authenticates as a GitHub App: [`create_app_client`] builds an
//! app-level client from the app ID and private key, and
//! [`create_installation_client`] exchanges it for an installation-scoped
//! client that can read repositories and mutate pull requests.

use async_trait::async_trait;
use jsonwebtoken::EncodingKey;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod graphql;
pub mod models;
pub mod throttle;

use crate::graphql::{
    EnableAutoMergeData, GraphQlResponse, OrganizationRepositoriesData, RepositorySnapshotData,
    ENABLE_AUTO_MERGE_MUTATION, ORGANIZATION_REPOSITORIES_QUERY, REPOSITORY_SNAPSHOT_QUERY,
};
use crate::models::RepositorySnapshot;
use crate::throttle::Throttle;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The GitHub operations a patrol run performs.
///
/// The orchestrator in the core crate depends on this trait rather than on
/// [`GitHubPatrolClient`] directly, so tests can substitute a recording
/// implementation without any network traffic.
#[async_trait]
pub trait PatrolClient: Send + Sync {
    /// Lists the names of all repositories in the organization, draining the
    /// paginated repository connection to the end.
    async fn list_repository_names(&self, owner: &str) -> Result<Vec<String>, Error>;

    /// Fetches the open pull requests and branch protection rules of one
    /// repository in a single query.
    async fn fetch_repository_snapshot(
        &self,
        owner: &str,
        repository: &str,
    ) -> Result<RepositorySnapshot, Error>;

    /// Enables auto-merge on the pull request with the given GraphQL node ID,
    /// using the repository's default merge method.
    async fn enable_auto_merge(&self, pull_request_id: &str) -> Result<(), Error>;

    /// Returns the attempt count recorded for a workflow run.
    async fn workflow_run_attempt(
        &self,
        owner: &str,
        repository: &str,
        run_id: u64,
    ) -> Result<u32, Error>;

    /// Requests a re-run of all jobs in a workflow run.
    async fn rerun_workflow(&self, owner: &str, repository: &str, run_id: u64)
        -> Result<(), Error>;
}

/// The REST workflow-run fields the patrol run reads.
#[derive(Debug, Deserialize)]
struct RestWorkflowRun {
    run_attempt: u32,
}

/// A [`PatrolClient`] backed by a real `Octocrab` instance.
pub struct GitHubPatrolClient {
    client: Octocrab,
    throttle: Throttle,
}

impl GitHubPatrolClient {
    /// Creates a new client from an authenticated `Octocrab` instance and the
    /// pacing policy to apply after each call.
    pub fn new(client: Octocrab, throttle: Throttle) -> Self {
        Self { client, throttle }
    }

    /// Issues one GraphQL request and unwraps the response envelope.
    ///
    /// The throttle pause runs after every request, including failed ones, so
    /// the call cadence does not depend on outcomes.
    async fn run_graphql<T: DeserializeOwned>(
        &self,
        payload: &serde_json::Value,
    ) -> Result<T, Error> {
        let response: Result<GraphQlResponse<T>, octocrab::Error> =
            self.client.graphql(payload).await;

        self.throttle.pause().await;

        let envelope = response.map_err(|e| {
            log_octocrab_error("GraphQL request failed", e);
            Error::ApiError()
        })?;

        envelope.into_data()
    }
}

#[async_trait]
impl PatrolClient for GitHubPatrolClient {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn list_repository_names(&self, owner: &str) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let payload = serde_json::json!({
                "query": ORGANIZATION_REPOSITORIES_QUERY,
                "variables": { "login": owner, "cursor": cursor },
            });

            let data: OrganizationRepositoriesData = self.run_graphql(&payload).await?;
            let organization = data.organization.ok_or_else(|| {
                error!(owner = owner, "Organization not found or not accessible");
                Error::NotFound
            })?;

            let page = organization.repositories;
            names.extend(page.nodes.into_iter().map(|node| node.name));

            if !page.page_info.has_next_page {
                break;
            }
            cursor = page.page_info.end_cursor;
        }

        info!(
            owner = owner,
            repository_count = names.len(),
            "Listed organization repositories"
        );

        Ok(names)
    }

    #[instrument(skip(self), fields(owner = %owner, repository = %repository))]
    async fn fetch_repository_snapshot(
        &self,
        owner: &str,
        repository: &str,
    ) -> Result<RepositorySnapshot, Error> {
        let payload = serde_json::json!({
            "query": REPOSITORY_SNAPSHOT_QUERY,
            "variables": { "owner": owner, "name": repository },
        });

        let data: RepositorySnapshotData = self.run_graphql(&payload).await?;
        let repository_node = data.repository.ok_or_else(|| {
            error!(
                owner = owner,
                repository = repository,
                "Repository not found or not accessible"
            );
            Error::NotFound
        })?;

        let snapshot = RepositorySnapshot::from(repository_node);

        debug!(
            owner = owner,
            repository = repository,
            pull_request_count = snapshot.pull_requests.len(),
            rule_count = snapshot.branch_protection_rules.len(),
            "Fetched repository snapshot"
        );

        Ok(snapshot)
    }

    #[instrument(skip(self), fields(pull_request_id = %pull_request_id))]
    async fn enable_auto_merge(&self, pull_request_id: &str) -> Result<(), Error> {
        let payload = serde_json::json!({
            "query": ENABLE_AUTO_MERGE_MUTATION,
            "variables": { "pullRequestId": pull_request_id },
        });

        let _data: EnableAutoMergeData = self.run_graphql(&payload).await?;

        info!(
            pull_request_id = pull_request_id,
            "Enabled auto-merge on pull request"
        );

        Ok(())
    }

    #[instrument(skip(self), fields(owner = %owner, repository = %repository))]
    async fn workflow_run_attempt(
        &self,
        owner: &str,
        repository: &str,
        run_id: u64,
    ) -> Result<u32, Error> {
        let route = format!("/repos/{}/{}/actions/runs/{}", owner, repository, run_id);
        let result: Result<RestWorkflowRun, octocrab::Error> =
            self.client.get(&route, None::<&()>).await;

        self.throttle.pause().await;

        let run = result.map_err(|e| {
            log_octocrab_error("Failed to get workflow run", e);
            Error::ApiError()
        })?;

        debug!(
            run_id,
            run_attempt = run.run_attempt,
            "Retrieved workflow run attempt count"
        );

        Ok(run.run_attempt)
    }

    #[instrument(skip(self), fields(owner = %owner, repository = %repository))]
    async fn rerun_workflow(
        &self,
        owner: &str,
        repository: &str,
        run_id: u64,
    ) -> Result<(), Error> {
        let route = format!(
            "/repos/{}/{}/actions/runs/{}/rerun",
            owner, repository, run_id
        );
        let result: Result<serde_json::Value, octocrab::Error> =
            self.client.post(&route, None::<&()>).await;

        self.throttle.pause().await;

        result.map_err(|e| {
            log_octocrab_error("Failed to re-run workflow", e);
            Error::ApiError()
        })?;

        info!(run_id, "Requested workflow re-run");

        Ok(())
    }
}

/// Creates an `Octocrab` client authenticated as a GitHub App using a JWT token.
///
/// This function generates a JSON Web Token (JWT) for the specified GitHub App ID and private key,
/// and uses it to create an authenticated `Octocrab` client. The client can then be used to perform
/// API operations on behalf of the GitHub App.
///
/// # Arguments
///
/// * `app_id` - The ID of the GitHub App.
/// * `private_key` - The private key associated with the GitHub App, in PEM format.
///
/// # Returns
///
/// A `Result` containing an authenticated `Octocrab` client, or an `Error` if the operation fails.
///
/// # Errors
///
/// This function returns an `Error` in the following cases:
/// - If the private key cannot be parsed.
/// - If the `Octocrab` client cannot be built.
#[instrument(skip(private_key))]
pub async fn create_app_client(app_id: u64, private_key: &str) -> Result<Octocrab, Error> {
    info!(
        app_id = app_id,
        key_length = private_key.len(),
        "Creating GitHub App client with provided credentials"
    );

    let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
        error!(
            app_id = app_id,
            error = %e,
            "Failed to parse RSA private key - key format is invalid"
        );
        Error::AuthError(format!("Failed to translate the private key. Error was: {}", e))
    })?;

    let octocrab = Octocrab::builder()
        .app(app_id.into(), key)
        .build()
        .map_err(|e| {
            error!(
                app_id = app_id,
                error = ?e,
                "Failed to build Octocrab client with GitHub App credentials"
            );
            Error::AuthError("Failed to build the GitHub App client.".to_string())
        })?;

    info!(app_id = app_id, "Successfully created GitHub App client");

    Ok(octocrab)
}

/// Authenticates with GitHub using an installation access token for a specific app installation.
///
/// This function retrieves an access token for a GitHub App installation and creates a new
/// `Octocrab` client authenticated with that token. The returned client performs API operations
/// on behalf of the installation, which is what grants access to the organization's private
/// repositories.
///
/// # Arguments
///
/// * `octocrab` - An `Octocrab` client authenticated as the GitHub App.
/// * `installation_id` - The ID of the GitHub App installation.
///
/// # Errors
///
/// This function returns an `Error` if the installation cannot be found or the access token
/// cannot be created.
#[instrument(skip(octocrab))]
pub async fn create_installation_client(
    octocrab: &Octocrab,
    installation_id: u64,
) -> Result<Octocrab, Error> {
    debug!(installation_id, "Finding installation");

    let (api_with_token, _) = octocrab
        .installation_and_token(installation_id.into())
        .await
        .map_err(|_| {
            error!(
                installation_id,
                "Failed to create a token for the installation",
            );

            Error::InvalidResponse
        })?;

    info!(installation_id, "Created access token for installation");

    Ok(api_with_token)
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidHeaderValue { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. One of the header values was invalid.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
