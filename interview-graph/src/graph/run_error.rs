//! Graph run error.

use thiserror::Error;

use crate::error::AgentError;
use crate::memory::CheckpointError;
use crate::state::StateError;

/// Error from `CompiledStateGraph::invoke` / `resume`.
///
/// Step failures carry the failing node id and the underlying cause. Every
/// variant raised mid-run leaves a `failed` checkpoint behind when the graph
/// has a checkpointer.
#[derive(Debug, Error)]
pub enum RunError {
    /// A node returned an error.
    #[error("step {node} failed: {source}")]
    StepFailed { node: String, source: AgentError },

    /// A router returned a key missing from its path map.
    #[error("router at {from} returned unknown route {route}")]
    UnknownRoute { from: String, route: String },

    /// A node returned an update that does not fit the state schema.
    #[error("step {node} returned an invalid update: {source}")]
    InvalidUpdate { node: String, source: StateError },

    /// Resume overrides do not fit the state schema.
    #[error("invalid resume overrides: {0}")]
    InvalidOverride(#[source] StateError),

    /// A checkpoint names a node this graph does not have.
    #[error("unknown node in checkpoint: {0}")]
    UnknownNode(String),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// A step task panicked or was cancelled.
    #[error("step task aborted: {0}")]
    TaskPanicked(String),

    /// Resume or inspection needs a checkpointer.
    #[error("graph was compiled without a checkpointer")]
    NoCheckpointer,

    /// The graph has a checkpointer but `config.thread_id` is not set.
    #[error("thread_id is required when the graph has a checkpointer")]
    MissingThreadId,
}

impl RunError {
    /// Node id for step-level failures.
    pub fn node(&self) -> Option<&str> {
        match self {
            RunError::StepFailed { node, .. } | RunError::InvalidUpdate { node, .. } => Some(node),
            RunError::UnknownRoute { from, .. } => Some(from),
            _ => None,
        }
    }
}
