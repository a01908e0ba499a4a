//! Node middleware: wraps every `Node::run` call made by the engine.
//!
//! Attach with [`StateGraph::with_middleware`](super::StateGraph::with_middleware)
//! or one of the `compile_with_*middleware` variants.

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::GraphState;

/// Boxed future returned by the wrapped node call.
pub type NodeFuture<U> = Pin<Box<dyn Future<Output = Result<U, AgentError>> + Send>>;

/// The wrapped node call; invoke it at most once with the (possibly adjusted) state.
pub type NodeCall<S> = Box<dyn FnOnce(S) -> NodeFuture<<S as GraphState>::Update> + Send>;

/// Around-advice for node execution.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: GraphState,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeCall<S>,
    ) -> Result<S::Update, AgentError>;
}

/// Logs node enter/exit with elapsed time and the fields each update writes.
pub struct LoggingNodeMiddleware;

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware
where
    S: GraphState,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeCall<S>,
    ) -> Result<S::Update, AgentError> {
        tracing::info!(node = node_id, "enter node");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(update) => tracing::info!(
                node = node_id,
                elapsed_ms,
                fields = ?S::update_fields(update),
                "exit node"
            ),
            Err(e) => tracing::warn!(node = node_id, elapsed_ms, error = %e, "exit node with error"),
        }
        result
    }
}
