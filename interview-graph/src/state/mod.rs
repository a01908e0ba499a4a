//! Shared state record threaded through the pipeline.
//!
//! One state type flows through every node; nodes never return a whole new
//! state, only a typed partial update that the engine applies by field-wise
//! overwrite. [`GraphState`] is the seam the graph engine is generic over;
//! [`InterviewState`] and [`StateUpdate`] are the interview pipeline's record.

mod interview_state;
mod question;
mod update;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use interview_state::InterviewState;
pub use question::Question;
pub use update::StateUpdate;

/// State type usable by [`StateGraph`](crate::graph::StateGraph).
///
/// `Update` is the partial-update record returned by nodes and accepted as
/// resume overrides. Both must be serializable so checkpoints and overrides
/// can cross process boundaries.
pub trait GraphState:
    Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static
{
    type Update: Clone + Send + Sync + Debug + Default + Serialize + DeserializeOwned + 'static;

    /// Applies `update` by field-wise overwrite. Fields absent from the update are untouched.
    fn apply(&mut self, update: Self::Update);

    /// Checks an update against the record schema (ranges, invariants) before it is applied.
    fn validate(_update: &Self::Update) -> Result<(), StateError> {
        Ok(())
    }

    /// Names of the fields `update` writes.
    fn update_fields(_update: &Self::Update) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Error when an update or override does not fit the state schema.
#[derive(Debug, Error)]
pub enum StateError {
    /// A field value is outside its allowed range.
    #[error("field {field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// A dynamic override could not be decoded (unknown field, wrong type, input field).
    #[error("invalid override: {0}")]
    InvalidOverride(String),
}
