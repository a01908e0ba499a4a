//! Node trait: one step of a state graph.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::GraphState;

use super::RunContext;

/// One unit of work in a graph.
///
/// Receives an owned snapshot of the state taken when the step was scheduled
/// and returns only the fields it changed. The engine applies the update; a
/// node never mutates shared state directly and must not keep the snapshot
/// around after returning.
///
/// Running a node twice with equivalent input is expected (revision loops),
/// so implementations should not guard against re-invocation.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: GraphState,
{
    /// Node id; matches the id used in `StateGraph::add_node`.
    fn id(&self) -> &str;

    /// Runs the step. An `Err` is fatal to the run unless the node degrades
    /// to a default itself.
    async fn run(&self, state: S, ctx: &RunContext) -> Result<S::Update, AgentError>;
}
