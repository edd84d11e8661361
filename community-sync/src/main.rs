//! Community Sync Web Server - Clerk webhook receiver.
//!
//! This binary:
//! - Receives Clerk webhooks delivered through Svix
//! - Verifies their signatures
//! - Publishes the resulting community commands to RabbitMQ

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use community_sync::web::CLERK_WEBHOOK_PATH;
use community_sync::{router, AppState, Config, Publisher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    let config = Config::from_env();
    info!(
        port = config.port,
        webhook_secret_configured = config.has_webhook_secret(),
        webhook_tolerance_secs = config.webhook_tolerance_secs,
        actions_queue = %config.actions_queue,
        "config_loaded"
    );

    if !config.has_webhook_secret() {
        error!(
            env_var = community_sync::config::WEBHOOK_SECRET_VAR,
            "webhook_secret_missing"
        );
    }

    let publisher = Publisher::new(config.cloudamqp_url.clone(), config.actions_queue.clone());
    info!("rabbitmq_publisher_created");

    let port = config.port;
    let state = AppState::new(config, Arc::new(publisher.clone()))
        .context("Invalid webhook secret")?;

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, path = CLERK_WEBHOOK_PATH, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    publisher.close().await;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
