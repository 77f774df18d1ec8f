//! Connectivity probe against the backend health endpoint

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::with_timeout;
use crate::config::Config;
use crate::io::HttpClient;

/// Header carrying the client application identifier
pub const APP_ID_HEADER: &str = "X-App-ID";

/// Overall outcome reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Ok,
    Error,
}

/// Manifest reachability as seen by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestState {
    Running,
    Disconnected,
}

/// Health report as returned by the backend health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub timestamp: String,
    pub app_id: String,
    pub manifest: ManifestState,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub success: bool,
    pub status: Option<HealthStatus>,
    pub error: Option<String>,
}

impl ProbeResult {
    fn connected(status: HealthStatus) -> Self {
        Self {
            success: true,
            status: Some(status),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            status: None,
            error: Some(error),
        }
    }
}

/// Checks once whether the backend answers its health endpoint
pub struct ConnectivityProbe {
    url: String,
    app_id: String,
    timeout: Duration,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ConnectivityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityProbe")
            .field("url", &self.url)
            .field("app_id", &self.app_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectivityProbe {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        Self {
            url: config.health_url(),
            app_id: config.app_id.clone(),
            timeout: config.request_timeout,
            http,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the health endpoint; any failure yields `success == false`
    pub async fn probe(&self) -> ProbeResult {
        tracing::debug!("Probing {} as {}", self.url, self.app_id);
        match self.check().await {
            Ok(status) => {
                tracing::debug!("Health endpoint answered: {:?}", status);
                ProbeResult::connected(status)
            }
            Err(e) => {
                tracing::debug!("Health probe of {} failed: {}", self.url, e);
                ProbeResult::failed(e.to_string())
            }
        }
    }

    async fn check(&self) -> crate::Result<HealthStatus> {
        let headers = [(APP_ID_HEADER, self.app_id.as_str())];
        let response = with_timeout(
            self.timeout,
            "health check",
            self.http.get(&self.url, &headers),
        )
        .await?
        .error_for_status()?;

        Ok(serde_json::from_str(&response.body)?)
    }
}
