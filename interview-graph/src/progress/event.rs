//! Progress event record.

use serde::{Deserialize, Serialize};

/// Kind of a progress event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// What a step is doing right now ("drafting technical questions (v2)").
    Thought,
    /// Final or intermediate outcome worth showing to the caller.
    Result,
    /// The run failed; sent right before the channel closes.
    Error,
}

/// Immutable progress event emitted by a step or by the service.
///
/// Serializes as `{"kind":"thought","text":"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub kind: EventKind,
    pub text: String,
}

impl ProgressEvent {
    pub fn thought(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Thought,
            text: text.into(),
        }
    }

    pub fn result(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Result,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            text: text.into(),
        }
    }
}
