//! GraphQL wire types and query text for the GitHub v4 API.
//!
//! The structs here mirror the exact shape of the GraphQL responses the client
//! requests, camelCase field names included. They exist only to deserialize
//! the wire payload; [`crate::models`] holds the domain types handed to
//! consumers, and the `From` conversions at the bottom of this module are the
//! only way wire data crosses that boundary.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::Error;
use crate::models::{
    BranchProtectionRule, CheckConclusion, CheckSuite, PullRequest, RepositorySnapshot,
    WorkflowRun,
};

#[cfg(test)]
#[path = "graphql_tests.rs"]
mod tests;

/// Query that pages through the repository names of an organization.
///
/// Variables: `login` (organization login), `cursor` (opaque page cursor or
/// null for the first page).
pub const ORGANIZATION_REPOSITORIES_QUERY: &str = r#"
query($login: String!, $cursor: String) {
    organization(login: $login) {
        repositories(first: 100, after: $cursor) {
            nodes {
                name
            }
            pageInfo {
                endCursor
                hasNextPage
            }
        }
    }
}
"#;

/// Query that fetches the open pull requests and branch protection rules of
/// one repository in a single round trip.
///
/// Variables: `owner`, `name`. Pull requests carry the check suites of their
/// newest commit so the caller never issues a follow-up query per pull
/// request.
pub const REPOSITORY_SNAPSHOT_QUERY: &str = r#"
query($owner: String!, $name: String!) {
    repository(owner: $owner, name: $name) {
        pullRequests(states: OPEN, last: 20) {
            nodes {
                id
                number
                title
                url
                author {
                    login
                }
                autoMergeRequest {
                    enabledAt
                }
                commits(last: 1) {
                    nodes {
                        commit {
                            checkSuites(last: 100) {
                                nodes {
                                    id
                                    conclusion
                                    workflowRun {
                                        databaseId
                                        workflow {
                                            name
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        branchProtectionRules(last: 20) {
            nodes {
                pattern
                requiredApprovingReviewCount
                requiresStatusChecks
                requiresStrictStatusChecks
                requiresApprovingReviews
                requiredStatusCheckContexts
            }
        }
    }
}
"#;

/// Mutation that enables auto-merge on a pull request by node ID.
///
/// Variables: `pullRequestId`. The merge method is left to the repository
/// default.
pub const ENABLE_AUTO_MERGE_MUTATION: &str = r#"
mutation($pullRequestId: ID!) {
    enablePullRequestAutoMerge(input: { pullRequestId: $pullRequestId }) {
        clientMutationId
    }
}
"#;

/// The standard GraphQL response envelope.
///
/// GitHub returns HTTP 200 for queries that fail at the GraphQL layer, so the
/// `errors` array must be inspected before `data` is trusted.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

/// A single entry in the GraphQL `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Unwraps the envelope into its payload.
    ///
    /// A non-empty `errors` array wins over any partial `data`; an envelope
    /// with neither errors nor data is an invalid response.
    pub fn into_data(self) -> Result<T, Error> {
        if let Some(errors) = self.errors {
            if !errors.is_empty() {
                let joined = errors
                    .into_iter()
                    .map(|entry| entry.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::GraphQlError(joined));
            }
        }

        self.data.ok_or(Error::InvalidResponse)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRepositoriesData {
    pub organization: Option<OrganizationNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub nodes: Vec<RepositoryNameNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNameNode {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshotData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub pull_requests: Connection<WirePullRequest>,
    pub branch_protection_rules: Connection<WireBranchProtectionRule>,
}

/// A connection whose page info the query never requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePullRequest {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: Option<WireActor>,
    pub auto_merge_request: Option<WireAutoMergeRequest>,
    pub commits: Connection<WireCommitNode>,
}

/// The author of a pull request. Null on the wire when the account was
/// deleted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireActor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAutoMergeRequest {
    pub enabled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCommitNode {
    pub commit: WireCommit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCommit {
    pub check_suites: Connection<WireCheckSuite>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCheckSuite {
    pub id: String,
    pub conclusion: Option<CheckConclusion>,
    pub workflow_run: Option<WireWorkflowRun>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWorkflowRun {
    pub database_id: u64,
    pub workflow: WireWorkflow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBranchProtectionRule {
    pub pattern: String,
    pub required_approving_review_count: Option<u32>,
    pub requires_status_checks: bool,
    pub requires_strict_status_checks: bool,
    pub requires_approving_reviews: bool,
    pub required_status_check_contexts: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireWorkflow {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableAutoMergeData {
    pub enable_pull_request_auto_merge: Option<EnableAutoMergePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableAutoMergePayload {
    pub client_mutation_id: Option<String>,
}

impl From<WireWorkflowRun> for WorkflowRun {
    fn from(wire: WireWorkflowRun) -> Self {
        WorkflowRun {
            database_id: wire.database_id,
            workflow_name: wire.workflow.name,
        }
    }
}

impl From<WireCheckSuite> for CheckSuite {
    fn from(wire: WireCheckSuite) -> Self {
        CheckSuite {
            id: wire.id,
            conclusion: wire.conclusion,
            workflow_run: wire.workflow_run.map(WorkflowRun::from),
        }
    }
}

impl From<WirePullRequest> for PullRequest {
    fn from(wire: WirePullRequest) -> Self {
        let check_suites = wire
            .commits
            .nodes
            .into_iter()
            .flat_map(|node| node.commit.check_suites.nodes)
            .map(CheckSuite::from)
            .collect();

        PullRequest {
            id: wire.id,
            number: wire.number,
            title: wire.title,
            url: wire.url,
            author_login: wire.author.map(|actor| actor.login).unwrap_or_default(),
            auto_merge_enabled_at: wire
                .auto_merge_request
                .and_then(|request| request.enabled_at),
            check_suites,
        }
    }
}

impl From<WireBranchProtectionRule> for BranchProtectionRule {
    fn from(wire: WireBranchProtectionRule) -> Self {
        BranchProtectionRule {
            pattern: wire.pattern,
            required_approving_review_count: wire.required_approving_review_count,
            requires_status_checks: wire.requires_status_checks,
            requires_strict_status_checks: wire.requires_strict_status_checks,
            requires_approving_reviews: wire.requires_approving_reviews,
            required_status_checks: wire.required_status_check_contexts.unwrap_or_default(),
        }
    }
}

impl From<RepositoryNode> for RepositorySnapshot {
    fn from(wire: RepositoryNode) -> Self {
        RepositorySnapshot {
            pull_requests: wire
                .pull_requests
                .nodes
                .into_iter()
                .map(PullRequest::from)
                .collect(),
            branch_protection_rules: wire
                .branch_protection_rules
                .nodes
                .into_iter()
                .map(BranchProtectionRule::from)
                .collect(),
        }
    }
}
