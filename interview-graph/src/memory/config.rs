//! Invoke config: thread_id, user_id.
//!
//! Passed to `CompiledStateGraph::invoke` / `resume` and handed to nodes via
//! `RunContext`.

/// Config for a single invoke. Identifies the thread (execution) and requester.
///
/// When the graph has a checkpointer, `thread_id` is required: every step's
/// snapshot is stored under it and resume looks it up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableConfig {
    /// Unique id of this execution/thread.
    pub thread_id: Option<String>,
    /// Requester identity; informational for nodes.
    pub user_id: Option<String>,
}

impl RunnableConfig {
    /// Config for `thread_id` with no user.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
