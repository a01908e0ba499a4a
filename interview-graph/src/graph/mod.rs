//! State graph: nodes, fan-out and conditional edges, interrupt points; compile and run.
//!
//! Build a [`StateGraph`], compile it (optionally with a checkpointer and node
//! middleware), then `invoke` / `resume` the [`CompiledStateGraph`].

mod compile_error;
mod compiled;
pub mod logging;
mod node;
mod node_middleware;
mod run_context;
mod run_error;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, GraphOutcome};
pub use node::Node;
pub use node_middleware::{LoggingNodeMiddleware, NodeCall, NodeFuture, NodeMiddleware};
pub use run_context::RunContext;
pub use run_error::RunError;
pub use state_graph::{Router, StateGraph, END, START};
