//! HTTP - axum ルーター
//!
//! - `POST /schedule`: タスク登録（成功時 `202`）
//! - `GET /schedule-view`: 発火待ちタスクの一覧
//!
//! エラー時のボディはプレーンテキストです。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::app::scheduler::{Registration, Scheduler};
use crate::domain::{ChimeError, ScheduleRequest, ValidationError};

pub fn router(scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route("/schedule", post(schedule).fallback(method_not_allowed))
        .route(
            "/schedule-view",
            get(schedule_view).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(scheduler)
}

impl IntoResponse for ChimeError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChimeError::Validation(_) => StatusCode::BAD_REQUEST,
            ChimeError::DuplicateId(_) => StatusCode::CONFLICT,
            ChimeError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn schedule(
    State(scheduler): State<Arc<Scheduler>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Registration>), ChimeError> {
    let req: ScheduleRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting undecodable schedule request");
        ValidationError::InvalidFormat
    })?;
    let registration = scheduler.register(req).await?;
    Ok((StatusCode::ACCEPTED, Json(registration)))
}

async fn schedule_view(State(scheduler): State<Arc<Scheduler>>) -> Result<Response, ChimeError> {
    let view = scheduler.view().await;
    let body = serde_json::to_vec(&view).map_err(|e| {
        error!(error = %e, "failed to encode schedule view");
        ChimeError::Encode(e)
    })?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
