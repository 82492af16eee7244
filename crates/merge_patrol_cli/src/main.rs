//! MergePatrol binary: one patrol run per invocation.
//!
//! There are no command line flags; everything is configured through the
//! `INPUT_*` environment variables read by
//! [`merge_patrol_core::PatrolConfig`]. The process exits with code 1 when
//! the configuration is incomplete, authentication fails, or the
//! organization's repositories cannot be listed, and 0 otherwise.

use github_client::throttle::Throttle;
use github_client::{create_app_client, create_installation_client, GitHubPatrolClient};
use merge_patrol_core::{config, Orchestrator, PatrolConfig};
use secrecy::ExposeSecret;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Initialize logging. The debug flag picks the default level;
    // MERGE_PATROL_LOG overrides it entirely.
    let default_level = if config::debug_flag_from_env() {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(
            EnvFilter::try_from_env("MERGE_PATROL_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match PatrolConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        owner = %config.owner,
        dry_run = config.dry_run,
        "Loaded patrol configuration"
    );

    let app_client =
        match create_app_client(config.app_id, config.private_key.expose_secret()).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to create GitHub App client: {e}");
                std::process::exit(1);
            }
        };

    let installation_client =
        match create_installation_client(&app_client, config.installation_id).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to authenticate as the app installation: {e}");
                std::process::exit(1);
            }
        };

    let client = GitHubPatrolClient::new(
        installation_client,
        Throttle::new(config.wait_between_requests),
    );

    let orchestrator = Orchestrator::new(&config, &client);
    if let Err(e) = orchestrator.run().await {
        error!("Patrol run failed: {e}");
        std::process::exit(1);
    }

    info!("Patrol run completed");
}
