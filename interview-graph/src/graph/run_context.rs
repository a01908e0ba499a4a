//! Run context handed to every node invocation.
//!
//! Carries the runnable config and the progress sender explicitly; nodes never
//! look either up through ambient or global state.

use crate::memory::RunnableConfig;
use crate::progress::ProgressSender;

#[derive(Clone, Debug, Default)]
pub struct RunContext {
    /// Config for the current run (thread_id, user_id).
    pub config: RunnableConfig,
    /// Progress events for this execution; detached when nobody streams the run.
    pub progress: ProgressSender,
}

impl RunContext {
    pub fn new(config: RunnableConfig, progress: ProgressSender) -> Self {
        Self { config, progress }
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.config.thread_id.as_deref()
    }
}
