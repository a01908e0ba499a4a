//! HTTP error type and status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use interview_graph::{ChannelError, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Service(e) => match e {
                ServiceError::NotFound(_) | ServiceError::Channel(ChannelError::NotFound(_)) => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::NotPaused { .. }
                | ServiceError::AlreadyRunning(_)
                | ServiceError::Channel(ChannelError::AlreadyAttached(_)) => StatusCode::CONFLICT,
                ServiceError::InvalidOverride(_) => StatusCode::BAD_REQUEST,
                ServiceError::Run { .. } | ServiceError::Checkpoint(_) | ServiceError::Compile(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": { "message": self.to_string() } });
        (status, Json(body)).into_response()
    }
}
