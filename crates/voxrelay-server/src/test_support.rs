//! Shared helpers for route tests

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use voxrelay::DEFAULT_TTS_MODEL;
use wiremock::MockServer;

use crate::config::RelayConfig;
use crate::{build_router, AppState};

pub const TEST_ORIGIN: &str = "https://app.example";

/// Fully configured relay pointing both upstreams at `server`
pub fn config_for(server: &MockServer) -> RelayConfig {
    RelayConfig {
        elevenlabs_api_key: Some("xi-test-key".to_string()),
        openai_api_key: Some("sk-test-key".to_string()),
        assistant_id: Some("asst_test".to_string()),
        allowed_origins: vec![TEST_ORIGIN.to_string()],
        elevenlabs_base_url: server.uri(),
        openai_base_url: server.uri(),
        default_tts_model: DEFAULT_TTS_MODEL.to_string(),
    }
}

pub fn app(config: RelayConfig) -> Router {
    build_router(AppState::from_config(&config).unwrap())
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ORIGIN, TEST_ORIGIN)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, TEST_ORIGIN)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body)
}
