//! refrain-pr - Playlist Refresh service
//!
//! Fetches public playlist metadata from the catalog, asks a hosted
//! text-generation endpoint for three candidate names, and turns the
//! chosen name into generated cover art. Serves its own web UI on
//! 127.0.0.1:5741.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use refrain_common::config::{default_config_path, load_toml_config, ServiceConfig};
use refrain_pr::services::NamingOrchestrator;
use refrain_pr::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Step 1: Load TOML config (missing file falls back to defaults)
    let config_path = default_config_path();
    let toml_config = load_toml_config(&config_path)?;

    // Initialize tracing with the configured level
    let level = toml_config
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting refrain-pr (Playlist Refresh) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", config_path.display());

    // Step 2: Resolve credentials and endpoints (ENV -> TOML)
    let config = ServiceConfig::resolve(&toml_config)
        .map_err(|e| anyhow::anyhow!("Configuration incomplete: {}", e))?;

    // Step 3: Build outbound clients and application state
    let orchestrator = NamingOrchestrator::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to build outbound clients: {}", e))?;
    let state = AppState::new(orchestrator);

    // Build router
    let app = refrain_pr::build_router(state);

    // Start server
    let addr = format!("127.0.0.1:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
