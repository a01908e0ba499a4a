//! # Memory: checkpointing
//!
//! Per-thread state snapshots so a run can pause before a human review point,
//! survive a process restart, and resume later.
//!
//! ## Config
//!
//! [`RunnableConfig`] is passed to `CompiledStateGraph::invoke` / `resume`. When the graph
//! has a checkpointer, `thread_id` is required and every snapshot is stored under it.
//!
//! ## Checkpointer implementations
//!
//! | Type             | Persistence | Use case                | Feature  |
//! |------------------|-------------|-------------------------|----------|
//! | [`MemorySaver`]  | In-memory   | Dev, tests              | none     |
//! | [`SqliteSaver`]  | SQLite file | Single-node, production | `sqlite` |
//!
//! Use with [`StateGraph::compile_with_checkpointer`](crate::graph::StateGraph::compile_with_checkpointer).
//! [`JsonSerializer`] is what `SqliteSaver` uses to store state as legible JSON.

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::{now_ms, Checkpoint, CheckpointStatus, CheckpointSummary};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
