//! Configuration loading for a patrol run.
//!
//! The configuration is read once from environment variables, validated, and
//! then passed around by reference as an immutable value. The variable names
//! keep the `INPUT_` prefix of GitHub Action inputs, which is the public
//! interface this tool has always had.

use std::env;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secrecy::SecretString;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Errors that can occur while loading the patrol configuration.
///
/// Configuration errors are fatal: they are reported before any GitHub API
/// call is made and the run never starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set or is empty.
    #[error("Required environment variable is not set: {0}")]
    MissingVariable(String),

    /// An environment variable is set but its value cannot be parsed.
    ///
    /// Parameters: the variable name and a description of the expected form.
    #[error("Environment variable {name} is invalid: expected {expected}")]
    InvalidVariable {
        /// The name of the offending variable.
        name: String,
        /// A short description of the expected value.
        expected: String,
    },
}

/// The immutable configuration of one patrol run.
///
/// Constructed once by [`PatrolConfig::from_env`] and never mutated
/// afterwards. The private key is held as a [`SecretString`] so it is
/// redacted from any `Debug` output.
#[derive(Debug)]
pub struct PatrolConfig {
    /// The GitHub organization whose repositories are patrolled.
    pub owner: String,
    /// Repository name prefixes that select which repositories to patrol.
    pub repo_prefixes: Vec<String>,
    /// The author logins whose pull requests may receive auto-merge.
    pub actors: Vec<String>,
    /// The branch name whose protection rule is consulted.
    pub default_branch: String,
    /// The pause applied after every GitHub API call.
    pub wait_between_requests: Duration,
    /// The maximum number of attempts a workflow run may accumulate before
    /// re-runs stop.
    pub max_run_attempts: u32,
    /// When set, mutating commands are logged instead of executed.
    pub dry_run: bool,
    /// When set, the default log filter level is `debug` instead of `info`.
    pub debug: bool,
    /// The GitHub App ID used to authenticate.
    pub app_id: u64,
    /// The installation of the GitHub App within the organization.
    pub installation_id: u64,
    /// The GitHub App private key in PEM form.
    pub private_key: SecretString,
}

impl PatrolConfig {
    /// Loads the configuration from the environment.
    ///
    /// All variables except the two booleans are required. The PEM private
    /// key arrives base64-encoded in `INPUT_PEM` and is decoded here; the
    /// decoded key never appears in logs.
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner = required_var("INPUT_OWNER")?;
        let repo_prefixes = list_var("INPUT_REPO_PREFIXES")?;
        let actors = list_var("INPUT_ACTORS")?;
        let default_branch = required_var("INPUT_DEFAULT_BRANCH")?;

        let wait_seconds = parse_var::<u64>("INPUT_WAIT_SECONDS_BETWEEN_REQUESTS", "a number of seconds")?;
        let max_run_attempts = parse_var::<u32>("INPUT_MAX_RUN_ATTEMPTS", "a whole number of attempts")?;
        let app_id = parse_var::<u64>("INPUT_APP_ID", "a numeric GitHub App ID")?;
        let installation_id =
            parse_var::<u64>("INPUT_INSTALLATION_ID", "a numeric installation ID")?;

        let private_key = pem_var("INPUT_PEM")?;

        let debug = bool_var("INPUT_DEBUG");
        let dry_run = bool_var("INPUT_DRY_RUN");

        Ok(Self {
            owner,
            repo_prefixes,
            actors,
            default_branch,
            wait_between_requests: Duration::from_secs(wait_seconds),
            max_run_attempts,
            dry_run,
            debug,
            app_id,
            installation_id,
            private_key,
        })
    }
}

/// Reads the debug flag on its own, for use before the full configuration is
/// loaded. Tracing has to be initialised before configuration errors can be
/// reported, so this cannot wait for [`PatrolConfig::from_env`].
pub fn debug_flag_from_env() -> bool {
    bool_var("INPUT_DEBUG")
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable(name.to_string())),
    }
}

/// Splits a newline-separated variable into trimmed, non-empty entries.
fn list_var(name: &str) -> Result<Vec<String>, ConfigError> {
    let raw = required_var(name)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_var<T: std::str::FromStr>(name: &str, expected: &str) -> Result<T, ConfigError> {
    let raw = required_var(name)?;
    raw.trim().parse().map_err(|_| ConfigError::InvalidVariable {
        name: name.to_string(),
        expected: expected.to_string(),
    })
}

/// Booleans accept `true`/`false` in any case and default to `true` when the
/// variable is absent or unreadable, matching the conservative defaults of
/// the original action inputs.
fn bool_var(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !value.trim().eq_ignore_ascii_case("false"),
        Err(_) => true,
    }
}

fn pem_var(name: &str) -> Result<SecretString, ConfigError> {
    let raw = required_var(name)?;
    let decoded = BASE64
        .decode(raw.trim())
        .map_err(|_| ConfigError::InvalidVariable {
            name: name.to_string(),
            expected: "a base64-encoded PEM private key".to_string(),
        })?;

    let pem = String::from_utf8(decoded).map_err(|_| ConfigError::InvalidVariable {
        name: name.to_string(),
        expected: "a base64-encoded PEM private key".to_string(),
    })?;

    Ok(SecretString::from(pem))
}
