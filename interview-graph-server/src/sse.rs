//! `GET /api/v1/runs/:id/stream`: progress events as Server-Sent Events.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use interview_graph::{InterviewService, ProgressEvent, ProgressReceiver};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::ServerError;

/// Terminating frame sent after the channel closes.
pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// One SSE frame for `event`.
pub fn frame(event: &ProgressEvent) -> String {
    let json = serde_json::to_string(event).unwrap_or_else(|_| {
        serde_json::json!({ "kind": "error", "text": "unencodable progress event" }).to_string()
    });
    format!("data: {}\n\n", json)
}

pub(crate) async fn stream_run(
    State(service): State<InterviewService>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let receiver = service.attach(&id)?;
    tracing::debug!(execution_id = %id, "progress stream attached");

    let (tx, rx) = mpsc::channel::<String>(64);
    tokio::spawn(forward(receiver, tx));

    let stream = ReceiverStream::new(rx).map(|s| Ok::<_, std::io::Error>(Bytes::from(s)));
    let mut res = (StatusCode::OK, Body::from_stream(stream)).into_response();
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(res)
}

/// Copies events to the HTTP body until the channel closes or the client goes away.
///
/// A client that disconnects while the run is quiet is noticed through
/// `tx.closed()`, so the receiver is dropped and the execution can be
/// re-attached right away.
async fn forward(mut receiver: ProgressReceiver, tx: mpsc::Sender<String>) {
    loop {
        let event = tokio::select! {
            event = receiver.recv() => event,
            _ = tx.closed() => {
                tracing::debug!(execution_id = %receiver.execution_id(), "stream client disconnected");
                return;
            }
        };
        let Some(event) = event else { break };
        if tx.send(frame(&event)).await.is_err() {
            tracing::debug!(execution_id = %receiver.execution_id(), "stream client disconnected");
            return;
        }
    }
    if receiver.dropped() > 0 {
        tracing::warn!(
            execution_id = %receiver.execution_id(),
            dropped = receiver.dropped(),
            "progress events dropped on overflow"
        );
    }
    let _ = tx.send(DONE_FRAME.to_string()).await;
}
