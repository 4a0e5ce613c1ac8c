//! API Errors
//!
//! Every handler failure ends up here and is rendered as
//! `{ "error": "<message>" }` with the matching status code.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use voxrelay::DomainError;

/// Relay handler errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/invalid field or unparsable body
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A server-held secret is absent
    #[error("{0} is not configured")]
    Configuration(String),

    /// Upstream transport failure or non-success status
    #[error("{0}")]
    Upstream(String),
}

/// JSON error body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Configuration(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::Configuration(key) => ApiError::Configuration(key),
            DomainError::Upstream(_) | DomainError::FailedToStart => {
                ApiError::Upstream(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Configuration(key) => {
                tracing::warn!("Request refused: {} is not configured", key)
            }
            ApiError::Upstream(msg) => tracing::warn!("Upstream failure: {}", msg),
            _ => {}
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Fallback for routes hit with a verb they do not serve.
///
/// Preflights never get here; a bare `OPTIONS` still gets an empty 200.
pub async fn method_not_allowed(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    ApiError::MethodNotAllowed.into_response()
}
