//! Configuration types for the FlavorForge client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Manifest backend, e.g. `http://localhost:1111`
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Path of the health endpoint relative to `backend_url`
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Sent as `X-App-ID` with the connectivity probe
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// Upper bound for every outbound call
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            health_path: default_health_path(),
            app_id: default_app_id(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Full URL of the health endpoint
    pub fn health_url(&self) -> String {
        let base = self.backend_url.trim_end_matches('/');
        if self.health_path.starts_with('/') {
            format!("{}{}", base, self.health_path)
        } else {
            format!("{}/{}", base, self.health_path)
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:1111".to_string()
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

fn default_app_id() -> String {
    "flavorforge-web".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
