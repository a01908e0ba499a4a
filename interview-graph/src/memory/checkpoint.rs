//! Checkpoint and status types.
//!
//! One checkpoint per thread: the latest state snapshot plus where the graph
//! stands (steps in flight, or the step it paused before).

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Where a thread's run stands as of its latest checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointStatus {
    /// Saved mid-run after a step completed; `pending` lists steps still in flight.
    Running,
    /// Stopped before an interrupt point; `pending` lists the steps to run on resume.
    Paused,
    /// Reached the end of every branch.
    Completed,
    /// A step failed; the snapshot holds the last successfully applied state.
    Failed,
}

impl CheckpointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckpointStatus::Running => "running",
            CheckpointStatus::Paused => "paused",
            CheckpointStatus::Completed => "completed",
            CheckpointStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckpointStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown checkpoint status: {}", other)),
        }
    }
}

/// Latest snapshot for one thread.
///
/// **Interaction**: Produced by the graph engine after every step; consumed by
/// `Checkpointer::put` and returned by `get` / `load` for resume and inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    pub thread_id: String,
    pub state: S,
    /// Steps in flight (running) or awaiting resume (paused). Empty when terminal.
    pub pending: Vec<String>,
    pub status: CheckpointStatus,
    /// Number of steps applied in this thread so far.
    pub step: u64,
    pub updated_at_ms: u64,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint stamped with the current time.
    pub fn new(
        thread_id: impl Into<String>,
        state: S,
        pending: Vec<String>,
        status: CheckpointStatus,
        step: u64,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            state,
            pending,
            status,
            step,
            updated_at_ms: now_ms(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.status == CheckpointStatus::Paused
    }

    /// Summary without the state payload.
    pub fn summary(&self) -> CheckpointSummary {
        CheckpointSummary {
            thread_id: self.thread_id.clone(),
            status: self.status,
            pending: self.pending.clone(),
            step: self.step,
            updated_at_ms: self.updated_at_ms,
        }
    }
}

/// Item returned by `Checkpointer::list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    pub thread_id: String,
    pub status: CheckpointStatus,
    pub pending: Vec<String>,
    pub step: u64,
    pub updated_at_ms: u64,
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    millis_since_epoch(SystemTime::now())
}

pub(crate) fn millis_since_epoch(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
