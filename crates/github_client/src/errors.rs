//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when interacting with the GitHub API
//! through the github_client crate. It provides comprehensive error context for debugging
//! and error handling in applications using this client.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// This enum represents all possible error conditions when working with the GitHub API,
/// including authentication failures, API errors, rate limiting, and data processing issues.
/// Each variant provides specific context about what went wrong and relevant details
/// for debugging and error handling.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// // Handle different error types
/// match client.fetch_repository_snapshot("acme", "widget").await {
///     Ok(snapshot) => println!("{} open pull requests", snapshot.pull_requests.len()),
///     Err(Error::AuthError(msg)) => eprintln!("Authentication failed: {}", msg),
///     Err(Error::RateLimitExceeded) => eprintln!("Rate limit exceeded, retry later"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    ///
    /// This error occurs when a GitHub API request fails for unspecified reasons.
    /// Check the GitHub API status and ensure your request parameters are correct.
    #[error("API request failed")]
    ApiError(),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when:
    /// - GitHub App credentials are invalid or expired
    /// - Network connectivity issues prevent authentication
    /// - The GitHub App lacks necessary permissions
    ///
    /// The contained string provides specific details about the authentication failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    ///
    /// This error occurs when the GitHub API returns a response that cannot be
    /// parsed into the expected data structure. This may indicate:
    /// - API version changes
    /// - Unexpected response format
    /// - Corrupted response data
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GraphQL endpoint accepted the request but reported query errors.
    ///
    /// GitHub's GraphQL API returns HTTP 200 even when the query itself fails,
    /// carrying the failures in an `errors` array instead. The contained string
    /// joins the reported error messages.
    #[error("GraphQL query returned errors: {0}")]
    GraphQlError(String),

    /// The GitHub API returned a response in an unexpected format.
    ///
    /// This error indicates that the API response structure doesn't match
    /// what the client expects. This may occur due to:
    /// - GitHub API changes or deprecations
    /// - Client library being out of date
    /// - Malformed API responses
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitHub API request returns a 404 status code,
    /// indicating that the requested resource (repository, workflow run, etc.)
    /// does not exist or is not accessible with the current authentication.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// This error occurs when the client has made too many requests in a given
    /// time window. The patrol run already spaces its calls with a fixed pause,
    /// so hitting this usually means another consumer shares the same token.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
