//! Reachability checks for the Manifest backend

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::io::HttpClient;
use crate::HealthError;

/// Decides whether the Manifest backend is reported as running
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ManifestCheck: Send + Sync {
    /// Returns an error when the backend should be reported as disconnected
    async fn check(&self) -> crate::Result<()>;
}

/// Reports the backend as running without contacting it
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysRunning;

#[async_trait]
impl ManifestCheck for AlwaysRunning {
    async fn check(&self) -> crate::Result<()> {
        Ok(())
    }
}

/// Issues a GET against the Manifest backend and requires a 2xx answer
pub struct HttpManifestCheck {
    url: String,
    timeout: Duration,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpManifestCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpManifestCheck")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpManifestCheck {
    pub fn new(url: impl Into<String>, timeout: Duration, http: Arc<dyn HttpClient>) -> Self {
        let url = url.into();
        tracing::debug!("Created HttpManifestCheck for {} (timeout {:?})", url, timeout);
        Self { url, timeout, http }
    }
}

#[async_trait]
impl ManifestCheck for HttpManifestCheck {
    async fn check(&self) -> crate::Result<()> {
        let response = tokio::time::timeout(self.timeout, self.http.get(&self.url))
            .await
            .map_err(|_| {
                HealthError::Timeout(format!(
                    "GET {} did not answer within {:?}",
                    self.url, self.timeout
                ))
            })??;

        if !response.is_success() {
            return Err(HealthError::ManifestUnavailable(format!(
                "GET {} returned status {}",
                self.url, response.status
            )));
        }

        tracing::debug!("Manifest backend at {} is reachable", self.url);
        Ok(())
    }
}
