//! Listener and shutdown handling

use crate::constants::{MEDIA_MOUNT_PATH, OPENAPI_PATH};
use anyhow::{Context, Result};
use axum::Router;
use std::net::{Ipv4Addr, SocketAddr};
use uploader_core::{Config, MediaHostBackend};

/// Address the API listens on: every interface, configured port
pub fn listen_addr(config: &Config) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.server_port))
}

/// Serve `app` until SIGINT or SIGTERM, then drain in-flight requests.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = listen_addr(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let local_media = (config.uses_media_host()
        && config.media_host_backend == MediaHostBackend::Local)
        .then_some(MEDIA_MOUNT_PATH);

    tracing::info!(
        addr = %addr,
        shape = %config.record_shape,
        store = %config.store_backend,
        max_file_size_bytes = config.max_file_size_bytes,
        openapi = OPENAPI_PATH,
        local_media = ?local_media,
        "Image API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on the first shutdown signal.
///
/// A signal source that cannot be installed is logged and ignored; the other
/// one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "Shutting down"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "Shutting down"),
    }
}
