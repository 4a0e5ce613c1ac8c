//! Assistant Routes - run creation and polling
//!
//! POST starts a run and returns `{ thread_id, run_id }`. GET with
//! `?thread_id=` reports `{ "status": "pending" }` or
//! `{ "status": "completed", "answer": ... }`; both are HTTP 200, since a
//! pending run is an expected outcome rather than an error.

use axum::{extract::State, routing::post, Json, Router};
use voxrelay::{CreateRunPayload, PollQuery, PollResult, RunHandle};

use crate::error::{method_not_allowed, ApiError, ErrorBody};
use crate::extract::{ValidJson, ValidQuery};
use crate::AppState;

/// Start an assistant run for an utterance
#[utoipa::path(
    post,
    path = "/api/assistant/runs",
    request_body = CreateRunPayload,
    responses(
        (status = 200, description = "Run started", body = RunHandle),
        (status = 400, description = "Missing text", body = ErrorBody),
        (status = 500, description = "Assistant failed to start or upstream error", body = ErrorBody)
    ),
    tag = "Assistant"
)]
pub async fn create_run(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateRunPayload>,
) -> Result<Json<RunHandle>, ApiError> {
    let handle = state.assistant.start_run(&request.text).await?;

    tracing::info!(
        thread_id = handle.thread_id(),
        run_id = handle.run_id(),
        "Assistant run started"
    );

    Ok(Json(handle))
}

/// Check whether a run has produced an answer
#[utoipa::path(
    get,
    path = "/api/assistant/runs",
    params(PollQuery),
    responses(
        (status = 200, description = "`{\"status\":\"pending\"}` or `{\"status\":\"completed\",\"answer\":\"...\"}`"),
        (status = 400, description = "Missing thread_id", body = ErrorBody),
        (status = 500, description = "Upstream error", body = ErrorBody)
    ),
    tag = "Assistant"
)]
pub async fn poll_run(
    State(state): State<AppState>,
    ValidQuery(thread_id): ValidQuery<PollQuery>,
) -> Result<Json<PollResult>, ApiError> {
    let result = state.assistant.poll(&thread_id).await?;
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/assistant/runs",
        post(create_run).get(poll_run).fallback(method_not_allowed),
    )
}
