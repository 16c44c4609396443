//! HTTP server lifecycle
//!
//! Binds the listener, serves the router and shuts down cleanly on Ctrl+C
//! (and SIGTERM on Unix).

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::{self, AppState};
use crate::config::ServiceConfig;
use crate::error::StartupError;

/// Start the server (blocks until shutdown)
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    config.ensure_config_dir()?;

    let config = Arc::new(config);
    let state = AppState::new(config.clone());

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind,
            source,
        })?;
    tracing::info!(
        "Serving {} on http://{}",
        config.data_dir.display(),
        config.bind
    );

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!(
                "Failed to set up SIGTERM handler: {:?}. Only Ctrl+C will work for shutdown.",
                e
            );
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down (Ctrl+C)");
        }
        _ = sigterm.recv() => {
            tracing::info!("Shutting down (SIGTERM)");
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down (Ctrl+C)");
}
