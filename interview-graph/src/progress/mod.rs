//! Progress events streamed to a caller while a run executes.
//!
//! Independent of the graph engine: the engine only hands each step the
//! [`ProgressSender`] it was given via [`RunContext`](crate::graph::RunContext).
//! Events are best-effort and never part of the state record.

mod event;
mod hub;

pub use event::{EventKind, ProgressEvent};
pub use hub::{
    ChannelError, ProgressHub, ProgressReceiver, ProgressSender, DEFAULT_CAPACITY, DEFAULT_LINGER,
};
