//! Shared nodes for state graph tests.

use std::sync::Arc;

use async_trait::async_trait;
use interview_graph::{AgentError, InterviewState, Node, RunContext, StateUpdate};

/// Writes a fixed update and records nothing else.
pub struct FixedNode {
    id: &'static str,
    update: StateUpdate,
}

impl FixedNode {
    pub fn new(id: &'static str, update: StateUpdate) -> Arc<Self> {
        Arc::new(Self { id, update })
    }

    pub fn noop(id: &'static str) -> Arc<Self> {
        Self::new(id, StateUpdate::default())
    }
}

#[async_trait]
impl Node<InterviewState> for FixedNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, _state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        ctx.progress.thought(format!("{} ran", self.id));
        Ok(self.update.clone())
    }
}
