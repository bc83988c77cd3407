//! # vasp-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the VASP directory API.
//! Binds to configurable port (default 8080).

use vasp_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "configuration loaded");
    let port = config.port;

    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!("Startup failed: {e}");
        e
    })?;
    tracing::info!(
        sectors = state.registry.len(),
        companies = state.directory.read().len(),
        "state ready"
    );

    let app = vasp_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("VASP directory API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
