//! Error types for the health service

/// Errors that can occur in the health service
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Manifest backend unavailable: {0}")]
    ManifestUnavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for health service operations
pub type Result<T> = std::result::Result<T, HealthError>;
