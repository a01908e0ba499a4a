//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges, routers or interrupt points
//! reference unknown nodes, or when a node has no way forward.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Validation ensures every id in edges, path maps and interrupt points
/// (except START/END) is registered, there is exactly one entry edge, and
/// every node has either static edges or one conditional edge out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// A registered node has no outgoing edge (use END to finish a branch).
    #[error("node {0} has no outgoing edge")]
    DeadEnd(String),

    /// A node has both static and conditional edges, or two routers.
    #[error("node {0} mixes static and conditional edges or has more than one router")]
    ConflictingEdges(String),

    /// A router's path map points at an unregistered node.
    #[error("router at {from} maps to unknown node {target}")]
    UnknownRouteTarget { from: String, target: String },

    /// `interrupt_before` names an unregistered node.
    #[error("interrupt point not found: {0}")]
    InterruptNodeNotFound(String),
}
