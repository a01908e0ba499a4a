//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/finish, node scheduling and
//! completion, routing decisions and state updates.

use super::RunError;

/// Log node scheduled and about to run.
pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id, "Starting node execution");
}

/// Log node completion with the fields its update writes.
pub fn log_node_complete(node_id: &str, fields: &[&'static str]) {
    tracing::debug!(node_id, ?fields, "Node execution complete");
}

/// Log state update after a node's update was applied.
pub fn log_state_update(node_id: &str, step: u64) {
    tracing::debug!(node_id, step, "State updated");
}

/// Log a router decision.
pub fn log_route(from: &str, route: &str, target: &str) {
    tracing::info!(from, route, target, "Routed");
}

/// Log that a node was reached but not run because it is an interrupt point.
pub fn log_interrupt(node_id: &str) {
    tracing::info!(node_id, "Pausing before interrupt point");
}

/// Log graph execution start.
pub fn log_graph_start(thread_id: Option<&str>, entry: &[String]) {
    tracing::info!(thread_id, ?entry, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(thread_id: Option<&str>, step: u64) {
    tracing::info!(thread_id, step, "Graph execution complete");
}

/// Log graph pause at interrupt points.
pub fn log_graph_paused(thread_id: Option<&str>, pending: &[String]) {
    tracing::info!(thread_id, ?pending, "Graph execution paused");
}

/// Log graph execution error.
pub fn log_graph_error(thread_id: Option<&str>, error: &RunError) {
    tracing::error!(thread_id, error = %error, "Graph execution error");
}
