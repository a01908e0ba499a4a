//! SQLite checkpointer (feature `sqlite`).
//!
//! One row per thread in table `checkpoints`. The state column holds the JSON
//! produced by the serializer and `pending` holds a JSON array of step names,
//! so a snapshot can be read with the `sqlite3` shell alone.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use super::checkpoint::millis_since_epoch;
use super::{
    Checkpoint, CheckpointError, CheckpointStatus, CheckpointSummary, Checkpointer, Serializer,
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS checkpoints (
    thread_id  TEXT PRIMARY KEY,
    status     TEXT NOT NULL,
    pending    TEXT NOT NULL,
    step       INTEGER NOT NULL,
    state      TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

/// Persistent checkpointer backed by a SQLite file.
///
/// All statements go through one connection behind a mutex, which also
/// serializes writes for the same thread. Statements run on the blocking pool
/// so a checkpoint write never stalls a runtime worker.
pub struct SqliteSaver<S> {
    conn: Arc<Mutex<Connection>>,
    serializer: Arc<dyn Serializer<S>>,
}

fn storage(e: rusqlite::Error) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

fn encode_pending(pending: &[String]) -> Result<String, CheckpointError> {
    serde_json::to_string(pending).map_err(|e| CheckpointError::Serialization(e.to_string()))
}

fn decode_pending(raw: &str) -> Result<Vec<String>, CheckpointError> {
    serde_json::from_str(raw).map_err(|e| CheckpointError::Serialization(e.to_string()))
}

fn decode_status(raw: &str) -> Result<CheckpointStatus, CheckpointError> {
    raw.parse().map_err(CheckpointError::Serialization)
}

/// Raw `checkpoints` row: status, pending, step, state, updated_at.
type Row = (String, String, i64, String, i64);

impl<S> SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Opens (or creates) the database at `path` and ensures the table exists.
    pub fn new(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer<S>>,
    ) -> Result<Self, CheckpointError> {
        let conn = Connection::open(path).map_err(storage)?;
        Self::with_connection(conn, serializer)
    }

    /// In-memory database; for tests.
    pub fn in_memory(serializer: Arc<dyn Serializer<S>>) -> Result<Self, CheckpointError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::with_connection(conn, serializer)
    }

    fn with_connection(
        conn: Connection,
        serializer: Arc<dyn Serializer<S>>,
    ) -> Result<Self, CheckpointError> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            serializer,
        })
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, CheckpointError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, CheckpointError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut guard)
        })
        .await
        .map_err(|e| CheckpointError::Storage(format!("sqlite task failed: {}", e)))?
    }
}

#[async_trait]
impl<S> Checkpointer<S> for SqliteSaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointError> {
        let bytes = self.serializer.serialize(&checkpoint.state)?;
        let state = String::from_utf8(bytes)
            .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        let pending = encode_pending(&checkpoint.pending)?;
        let thread_id = checkpoint.thread_id.clone();
        let status = checkpoint.status.as_str();
        let step = checkpoint.step as i64;
        let updated_at = checkpoint.updated_at_ms as i64;
        self.blocking(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO checkpoints
                 (thread_id, status, pending, step, state, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![thread_id, status, pending, step, state, updated_at],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint<S>>, CheckpointError> {
        let id = thread_id.to_string();
        let row: Option<Row> = self
            .blocking(move |conn| {
                conn.query_row(
                    "SELECT status, pending, step, state, updated_at
                     FROM checkpoints WHERE thread_id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
                )
                .optional()
                .map_err(storage)
            })
            .await?;

        let Some((status, pending, step, state, updated_at)) = row else {
            return Ok(None);
        };
        Ok(Some(Checkpoint {
            thread_id: thread_id.to_string(),
            state: self.serializer.deserialize(state.as_bytes())?,
            pending: decode_pending(&pending)?,
            status: decode_status(&status)?,
            step: step as u64,
            updated_at_ms: updated_at as u64,
        }))
    }

    async fn list(&self) -> Result<Vec<CheckpointSummary>, CheckpointError> {
        self.blocking(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT thread_id, status, pending, step, updated_at
                     FROM checkpoints ORDER BY updated_at DESC",
                )
                .map_err(storage)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                })
                .map_err(storage)?;

            let mut items = Vec::new();
            for row in rows {
                let (thread_id, status, pending, step, updated_at) = row.map_err(storage)?;
                items.push(CheckpointSummary {
                    thread_id,
                    status: decode_status(&status)?,
                    pending: decode_pending(&pending)?,
                    step: step as u64,
                    updated_at_ms: updated_at as u64,
                });
            }
            Ok(items)
        })
        .await
    }

    async fn prune(
        &self,
        older_than: SystemTime,
        live: &[String],
    ) -> Result<usize, CheckpointError> {
        let cutoff = millis_since_epoch(older_than) as i64;
        let live = live.to_vec();
        self.blocking(move |conn| {
            let tx = conn.transaction().map_err(storage)?;
            let expired: Vec<String> = {
                let mut stmt = tx
                    .prepare("SELECT thread_id FROM checkpoints WHERE updated_at < ?1")
                    .map_err(storage)?;
                let ids = stmt
                    .query_map(params![cutoff], |row| row.get::<_, String>(0))
                    .map_err(storage)?;
                ids.collect::<Result<_, _>>().map_err(storage)?
            };
            let mut removed = 0;
            for id in expired.iter().filter(|id| !live.contains(id)) {
                removed += tx
                    .execute("DELETE FROM checkpoints WHERE thread_id = ?1", params![id])
                    .map_err(storage)?;
            }
            tx.commit().map_err(storage)?;
            Ok(removed)
        })
        .await
    }
}
