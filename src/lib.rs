pub mod analysis; // Risk scoring, step insights, dataset statistics, reports
pub mod api; // HTTP router, middleware, server lifecycle
pub mod config;
pub mod core_state;
pub mod db;
pub mod doctors; // Practitioner directory + recommendation filter
pub mod models;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext, ServerError};
use crate::config::{Config, ConfigError};
use crate::core_state::{CoreError, CoreState};

/// Startup failures that end the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Startup error: {0}")]
    Core(#[from] CoreError),
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Initialize logging, build state, and serve until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(CoreState::from_config(&config)?);
    let ctx = ApiContext::from_config(core, &config);
    let mut server = start_server(ctx, &config.cors_allowed_origins, config.socket_addr()).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }

    server.shutdown();
    server.join().await;
    Ok(())
}
