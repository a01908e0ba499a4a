//! HTTP surface for the interview pipeline.
//!
//! | Method | Path                         | Body                                   | Reply                   |
//! |--------|------------------------------|----------------------------------------|-------------------------|
//! | POST   | `/api/v1/runs`               | `{jd_text, user_id}`                   | 202 `{execution_id}`    |
//! | POST   | `/api/v1/runs/:id/resume`    | `{action: approve\|retry, feedback?}`  | 202 `{execution_id}`    |
//! | GET    | `/api/v1/runs/:id/stream`    |                                        | `text/event-stream`     |
//! | GET    | `/api/v1/runs/:id`           |                                        | checkpoint snapshot     |
//! | GET    | `/api/v1/runs`               |                                        | checkpoint summaries    |
//!
//! Runs execute in the background; callers follow them on the stream, which
//! carries one `data: <event json>` frame per progress event and ends with
//! `data: [DONE]`.

mod error;
mod sse;

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use interview_graph::{InterviewService, ResumeAction, StartRequest};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

pub use error::ServerError;
pub use sse::{frame, DONE_FRAME};

/// Body of `POST /api/v1/runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartBody {
    pub jd_text: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Accepted {
    pub execution_id: String,
}

/// Builds the router over `service`.
pub fn app(service: InterviewService) -> Router {
    Router::new()
        .route("/api/v1/runs", post(start_run).get(list_runs))
        .route("/api/v1/runs/:id", get(get_run))
        .route("/api/v1/runs/:id/resume", post(resume_run))
        .route("/api/v1/runs/:id/stream", get(sse::stream_run))
        .layer(middleware::from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                info_span!("request", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// Logs method, path, status and elapsed time of every request.
async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::debug!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn start_run(
    State(service): State<InterviewService>,
    Json(body): Json<StartBody>,
) -> Result<impl IntoResponse, ServerError> {
    if body.jd_text.trim().is_empty() {
        return Err(ServerError::BadRequest("jd_text must not be empty".into()));
    }
    if body.user_id.trim().is_empty() {
        return Err(ServerError::BadRequest("user_id must not be empty".into()));
    }
    let execution_id = service.spawn_start(StartRequest::new(body.user_id, body.jd_text))?;
    Ok((StatusCode::ACCEPTED, Json(Accepted { execution_id })))
}

async fn resume_run(
    State(service): State<InterviewService>,
    Path(id): Path<String>,
    Json(action): Json<ResumeAction>,
) -> Result<impl IntoResponse, ServerError> {
    service.spawn_resume(&id, action).await?;
    Ok((StatusCode::ACCEPTED, Json(Accepted { execution_id: id })))
}

async fn get_run(
    State(service): State<InterviewService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(service.snapshot(&id).await?))
}

async fn list_runs(State(service): State<InterviewService>) -> Result<impl IntoResponse, ServerError> {
    Ok(Json(service.list().await?))
}
