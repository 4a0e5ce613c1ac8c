//! Voices Route - voice catalog passthrough
//!
//! The catalog holds nothing sensitive and the route sets no cookies, so it
//! is the one endpoint served with a wildcard `Access-Control-Allow-Origin`.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::cors;
use crate::error::{method_not_allowed, ApiError, ErrorBody};
use crate::AppState;

/// List available synthesis voices
#[utoipa::path(
    get,
    path = "/api/voices",
    responses(
        (status = 200, description = "Upstream voice catalog, passed through verbatim"),
        (status = 500, description = "Missing credential or upstream unreachable", body = ErrorBody)
    ),
    tag = "Voice"
)]
pub async fn list_voices(State(state): State<AppState>) -> Result<Response, ApiError> {
    let upstream = state.voice.list_voices().await?;
    let status = upstream.status();

    if !status.is_success() {
        tracing::warn!(%status, "Voice catalog request was not successful");
    }

    let body = upstream
        .bytes()
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub fn router() -> Router<AppState> {
    cors::public(
        Router::new().route("/api/voices", get(list_voices).fallback(method_not_allowed)),
    )
}
