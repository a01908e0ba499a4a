use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::interview::AWAITING_HUMAN;
use crate::state::{InterviewState, StateUpdate};

/// Human review point. The graph pauses before it; it only runs on resume,
/// after the reviewer's decision has been applied as overrides, and writes nothing.
pub struct HumanReviewNode;

#[async_trait]
impl Node<InterviewState> for HumanReviewNode {
    fn id(&self) -> &str {
        AWAITING_HUMAN
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        match &state.human_feedback {
            Some(feedback) => ctx
                .progress
                .thought(format!("Resumed after human review: {}", feedback)),
            None => ctx.progress.thought("Resumed after human review"),
        }
        Ok(StateUpdate::default())
    }
}
