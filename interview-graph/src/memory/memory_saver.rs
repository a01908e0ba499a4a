//! In-memory checkpointer for dev and tests.

use std::time::SystemTime;

use async_trait::async_trait;
use dashmap::DashMap;

use super::checkpoint::millis_since_epoch;
use super::{Checkpoint, CheckpointError, CheckpointSummary, Checkpointer};

/// In-memory checkpointer. Snapshots are lost when the saver is dropped.
///
/// Each `put` is an atomic per-key overwrite; different threads never contend
/// on the same entry.
pub struct MemorySaver<S> {
    checkpoints: DashMap<String, Checkpoint<S>>,
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self {
            checkpoints: DashMap::new(),
        }
    }
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointError> {
        self.checkpoints
            .insert(checkpoint.thread_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        Ok(self.checkpoints.get(thread_id).map(|c| c.value().clone()))
    }

    async fn list(&self) -> Result<Vec<CheckpointSummary>, CheckpointError> {
        let mut items: Vec<CheckpointSummary> =
            self.checkpoints.iter().map(|c| c.value().summary()).collect();
        items.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        Ok(items)
    }

    async fn prune(
        &self,
        older_than: SystemTime,
        live: &[String],
    ) -> Result<usize, CheckpointError> {
        let cutoff = millis_since_epoch(older_than);
        let before = self.checkpoints.len();
        self.checkpoints
            .retain(|id, c| c.updated_at_ms >= cutoff || live.contains(id));
        Ok(before.saturating_sub(self.checkpoints.len()))
    }
}
