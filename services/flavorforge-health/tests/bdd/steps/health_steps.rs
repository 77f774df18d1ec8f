//! BDD step definitions for the health endpoint feature

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use cucumber::{given, then, when};
use tower::ServiceExt;

use flavorforge_health::manifest::{AlwaysRunning, ManifestCheck};
use flavorforge_health::{build_router, HealthError, HealthState};

use crate::world::HealthWorld;

/// A Manifest check that always fails with a fixed message
struct FailingCheck {
    message: String,
}

#[async_trait]
impl ManifestCheck for FailingCheck {
    async fn check(&self) -> flavorforge_health::Result<()> {
        Err(HealthError::ManifestUnavailable(self.message.clone()))
    }
}

async fn send(world: &mut HealthWorld, method: Method, app_id: Option<&str>) {
    let state = world.state.clone().expect("health endpoint not set up");
    let mut request = Request::builder().method(method).uri("/health");
    if let Some(app_id) = app_id {
        request = request.header("X-App-ID", app_id);
    }

    let response = build_router(state)
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    world.status_code = Some(response.status().as_u16());
    world.headers = Some(response.headers().clone());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.body = Some(String::from_utf8(body.to_vec()).unwrap());
}

fn body_json(world: &HealthWorld) -> serde_json::Value {
    let body = world.body.as_ref().expect("no response body");
    serde_json::from_str(body).expect("response body is not JSON")
}

#[given("a health endpoint with a running Manifest backend")]
fn running_backend(world: &mut HealthWorld) {
    world.state = Some(HealthState::new(Arc::new(AlwaysRunning), "1.0.0"));
}

#[given(expr = "a health endpoint whose Manifest backend fails with {string}")]
fn failing_backend(world: &mut HealthWorld, message: String) {
    world.state = Some(HealthState::new(Arc::new(FailingCheck { message }), "1.0.0"));
}

#[when(expr = "a GET request is sent with app id {string}")]
async fn get_with_app_id(world: &mut HealthWorld, app_id: String) {
    send(world, Method::GET, Some(&app_id)).await;
}

#[when("a GET request is sent without an app id")]
async fn get_without_app_id(world: &mut HealthWorld) {
    send(world, Method::GET, None).await;
}

#[when("an OPTIONS request is sent")]
async fn options_request(world: &mut HealthWorld) {
    send(world, Method::OPTIONS, None).await;
}

#[then(expr = "the response status should be {int}")]
fn status_should_be(world: &mut HealthWorld, expected: u16) {
    assert_eq!(world.status_code, Some(expected));
}

#[then(expr = "the reported status should be {string}")]
fn reported_status(world: &mut HealthWorld, expected: String) {
    assert_eq!(body_json(world)["status"], expected.as_str());
}

#[then(expr = "the reported app id should be {string}")]
fn reported_app_id(world: &mut HealthWorld, expected: String) {
    assert_eq!(body_json(world)["appId"], expected.as_str());
}

#[then(expr = "the reported manifest state should be {string}")]
fn reported_manifest(world: &mut HealthWorld, expected: String) {
    assert_eq!(body_json(world)["manifest"], expected.as_str());
}

#[then(expr = "the reported version should be {string}")]
fn reported_version(world: &mut HealthWorld, expected: String) {
    assert_eq!(body_json(world)["version"], expected.as_str());
}

#[then(expr = "the reported error should contain {string}")]
fn reported_error(world: &mut HealthWorld, expected: String) {
    let json = body_json(world);
    let error = json["error"].as_str().expect("no error field");
    assert!(error.contains(&expected), "{error}");
}

#[then("the reported timestamp should be ISO-8601")]
fn reported_timestamp(world: &mut HealthWorld) {
    let json = body_json(world);
    let timestamp = json["timestamp"].as_str().expect("no timestamp field");
    assert!(
        chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
        "not ISO-8601: {timestamp}"
    );
}

#[then("the response body should be empty")]
fn body_empty(world: &mut HealthWorld) {
    assert_eq!(world.body.as_deref(), Some(""));
}

#[then("the CORS headers should be present")]
fn cors_headers_present(world: &mut HealthWorld) {
    let headers = world.headers.as_ref().expect("no response headers");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization, X-App-ID"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
