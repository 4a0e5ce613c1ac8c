//! Health Route

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
    voice_configured: bool,
    assistant_configured: bool,
}

/// Liveness check with a summary of which upstreams have credentials
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Relay is running", body = HealthCheck)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "voxrelay is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        voice_configured: state.voice.is_configured(),
        assistant_configured: state.assistant.is_configured(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use crate::config::RelayConfig;
    use crate::test_support::{app, call, get_request};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_missing_credentials() {
        let (status, _, body) = call(app(RelayConfig::default()), get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert_eq!(json["voice_configured"], false);
        assert_eq!(json["assistant_configured"], false);
    }
}
