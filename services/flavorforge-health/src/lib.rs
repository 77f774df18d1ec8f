//! FlavorForge health service
//!
//! Reports backend liveness over HTTP and echoes the caller's application id.

pub mod config;
pub mod error;
pub mod health;
pub mod io;
pub mod manifest;

pub use config::{load_config, Config};
pub use error::{HealthError, Result};
pub use health::{build_router, HealthState, HealthStatus, ManifestState, ServiceStatus};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::manifest::{AlwaysRunning, HttpManifestCheck, ManifestCheck};

/// Build the router state described by the configuration
pub fn build_state(config: &Config) -> Result<HealthState> {
    let check: Arc<dyn ManifestCheck> = match &config.health.manifest_url {
        Some(url) => {
            let timeout = config.health.check_timeout;
            let http = ReqwestHttpClient::with_timeout(timeout)?;
            Arc::new(HttpManifestCheck::new(url.clone(), timeout, Arc::new(http)))
        }
        None => Arc::new(AlwaysRunning),
    };
    Ok(HealthState::new(check, config.health.version.clone()))
}

/// Serve the health router on `listener` until `cancel` fires
pub async fn serve(
    listener: TcpListener,
    state: HealthState,
    cancel: CancellationToken,
) -> Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("Health endpoint stopped");
    Ok(())
}

/// Run the health service with the given configuration until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
        cancel_for_signal.cancel();
    });

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .map_err(|e| {
            HealthError::Config(format!(
                "Invalid listen address {}:{}: {}",
                config.server.bind_address, config.server.port, e
            ))
        })?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Health endpoint listening on http://{}", listener.local_addr()?);

    let state = build_state(&config)?;
    serve(listener, state, cancel).await
}
