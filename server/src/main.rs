//! Imagine Bot Server - Main Entry Point

use anyhow::Result;
use std::net::SocketAddr;
use tracing::{info, warn};

use imagine_server::{api, config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagine_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration (fails fast without a bot token)
    let config = config::Config::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Imagine Bot Server"
    );

    if !config.has_signing_secret() {
        warn!("SLACK_SIGNING_SECRET is not set; event requests will fail verification");
    }
    if !config.has_openai_token() {
        warn!("OPENAI_TOKEN is not set; image generation will fail");
    }

    // Build application state and router
    let bind_address = config.bind_address.clone();
    let state = api::AppState::from_config(config)?;
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("Server shutdown complete");

    Ok(())
}
