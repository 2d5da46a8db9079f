//! Roster Server — application entry point.

use roster_db::{DbConfig, DbManager, SurrealGroupRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("roster=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting roster server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(err) => {
            tracing::error!(error = %err, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(err) = roster_db::run_migrations(manager.client()).await {
        tracing::error!(error = %err, "Failed to run migrations");
        std::process::exit(1);
    }

    let _registry = SurrealGroupRegistry::new(manager.client().clone());
    tracing::info!("Group registry ready");

    // TODO: mount the REST transport on the registry

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }

    tracing::info!("roster server stopped.");
}
