//! Checkpointer trait and error type.

use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

use super::{Checkpoint, CheckpointStatus, CheckpointSummary};

/// Error from a checkpointer or from the resume protocol.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// No snapshot exists for this thread.
    #[error("checkpoint not found for thread {0}")]
    NotFound(String),

    /// Resume was requested for a thread that is not paused (running, completed or failed).
    #[error("thread {thread_id} is not paused (status: {status})")]
    NotPaused {
        thread_id: String,
        status: CheckpointStatus,
    },

    /// Backend failure (I/O, SQL).
    #[error("checkpoint storage error: {0}")]
    Storage(String),

    /// State could not be encoded or decoded.
    #[error("checkpoint serialization error: {0}")]
    Serialization(String),
}

/// Durable per-thread snapshot store.
///
/// `put` overwrites the previous snapshot for the same thread. Writes for one
/// thread come from one run at a time; different threads are independent.
///
/// **Interaction**: Used by `CompiledStateGraph` (after every step, on pause,
/// on resume) and by the service for inspection and expiry.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Saves `checkpoint`, replacing any earlier one for `checkpoint.thread_id`.
    async fn put(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointError>;

    /// Latest snapshot for `thread_id`, if any.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError>;

    /// Latest snapshot for `thread_id`; `NotFound` when there is none.
    async fn load(&self, thread_id: &str) -> Result<Checkpoint<S>, CheckpointError> {
        self.get(thread_id)
            .await?
            .ok_or_else(|| CheckpointError::NotFound(thread_id.to_string()))
    }

    /// Summaries of every stored thread, most recently updated first.
    async fn list(&self) -> Result<Vec<CheckpointSummary>, CheckpointError>;

    /// Removes snapshots last updated before `older_than`, whatever their status,
    /// except those of threads listed in `live` (runs still in flight).
    /// A `running` snapshot not in `live` was left behind by a run that died.
    /// Returns how many were removed.
    async fn prune(&self, older_than: SystemTime, live: &[String])
        -> Result<usize, CheckpointError>;
}
