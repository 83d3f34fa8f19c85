//! Quotes API HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use infrastructure::{AppConfig, build_stores, telemetry::init_telemetry};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let _telemetry = init_telemetry(&config.telemetry, config.server.log_format)
        .context("Failed to initialize telemetry")?;

    info!("Quotes API v{} starting...", env!("CARGO_PKG_VERSION"));

    config.validate().context("Invalid configuration")?;

    info!(
        environment = %config.environment,
        mode = %config.server.mode,
        host = %config.server.host,
        port = %config.server.port,
        rate_limit = config.security.rate_limit_enabled,
        "Configuration loaded"
    );

    let stores = build_stores(&config.store).context("Failed to initialize document store")?;

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let app = routes::create_app(AppState::new(stores, config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
    .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!("Connections still open after shutdown timeout, exiting");
        std::process::exit(1);
    });
}
