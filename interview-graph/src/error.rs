//! Step execution error types.
//!
//! Used by `Node::run` and every step of the interview pipeline. Engine-level
//! failures (which step failed, unknown routes, checkpoint problems) live in
//! [`RunError`](crate::graph::RunError).

use thiserror::Error;

/// Step execution error.
///
/// Returned by `Node::run` when a step fails. Unless the step defines its own
/// fallback, the engine treats this as fatal to the run.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. generation call failed).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The generation service answered, but not in the expected structure.
    #[error("invalid structured output: {0}")]
    InvalidOutput(String),
}

impl From<serde_json::Error> for AgentError {
    fn from(e: serde_json::Error) -> Self {
        AgentError::InvalidOutput(e.to_string())
    }
}
