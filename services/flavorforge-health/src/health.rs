//! Health endpoint: liveness report with CORS headers

use std::fmt;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::manifest::ManifestCheck;

/// Header carrying the caller's application identifier
pub const APP_ID_HEADER: &str = "x-app-id";

/// Reported when the caller sends no usable `X-App-ID`
pub const UNKNOWN_APP_ID: &str = "Unknown";

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-App-ID";
pub const ALLOW_CREDENTIALS: &str = "true";

/// Overall outcome of a health check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Ok,
    Error,
}

/// Whether the Manifest backend is considered reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestState {
    Running,
    Disconnected,
}

impl fmt::Display for ManifestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestState::Running => write!(f, "running"),
            ManifestState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Body returned by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub timestamp: String,
    pub app_id: String,
    pub manifest: ManifestState,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn ok(timestamp: String, app_id: String, version: String) -> Self {
        Self {
            status: ServiceStatus::Ok,
            timestamp,
            app_id,
            manifest: ManifestState::Running,
            version,
            error: None,
        }
    }

    pub fn failed(timestamp: String, app_id: String, version: String, error: String) -> Self {
        Self {
            status: ServiceStatus::Error,
            timestamp,
            app_id,
            manifest: ManifestState::Disconnected,
            version,
            error: Some(error),
        }
    }
}

/// Router state shared by health requests
#[derive(Clone)]
pub struct HealthState {
    pub check: Arc<dyn ManifestCheck>,
    pub version: String,
}

impl fmt::Debug for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthState")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl HealthState {
    pub fn new(check: Arc<dyn ManifestCheck>, version: impl Into<String>) -> Self {
        Self {
            check,
            version: version.into(),
        }
    }
}

/// Build the health router; every response carries the CORS headers
pub fn build_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", any(health_handler))
        .route("/api/health", any(health_handler))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static(ALLOW_CREDENTIALS),
        ))
        .with_state(state)
}

async fn health_handler(
    State(state): State<HealthState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let timestamp = iso_timestamp(Utc::now());
    let app_id = app_id_from(&headers);

    tracing::info!("Health check at {}, App ID: {}", timestamp, app_id);

    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    match state.check.check().await {
        Ok(()) => {
            let status = HealthStatus::ok(timestamp, app_id, state.version.clone());
            tracing::info!("Health check successful: {:?}", status);
            (StatusCode::OK, Json(status)).into_response()
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            let status =
                HealthStatus::failed(timestamp, app_id, state.version.clone(), e.to_string());
            (StatusCode::INTERNAL_SERVER_ERROR, Json(status)).into_response()
        }
    }
}

/// `X-App-ID` value, or `Unknown` when missing, empty or not valid text
pub fn app_id_from(headers: &HeaderMap) -> String {
    headers
        .get(APP_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_APP_ID)
        .to_string()
}

/// UTC timestamp with millisecond precision, e.g. `2025-01-01T12:00:00.000Z`
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
