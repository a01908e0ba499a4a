use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::interview::{tasks, REVIEWING};
use crate::llm::{LlmClient, LlmRequest};
use crate::state::{InterviewState, StateUpdate};

use super::decode;

/// Score used when the review cannot be obtained or parsed.
pub const FALLBACK_SCORE: u8 = 95;
pub const FALLBACK_COMMENT: &str = "Review output could not be parsed; passing by default.";

const SYSTEM: &str = "You are a strict reviewer of technical interview questions. Score the \
draft from 0 to 100 for depth, accuracy and fit to the seniority, and give concrete revision \
advice. Reply with a single JSON object: {\"score\": integer, \"comment\": string}.";

#[derive(Debug, Deserialize)]
struct Review {
    score: i64,
    #[serde(default)]
    comment: String,
}

/// Scores the current technical draft.
///
/// Degrades instead of failing: an unavailable or unparsable review counts as
/// a pass with `FALLBACK_SCORE`.
pub struct ReviewerNode {
    llm: Arc<dyn LlmClient>,
}

impl ReviewerNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn review(&self, state: &InterviewState) -> Result<Review, AgentError> {
        let draft = serde_json::to_string_pretty(&state.tech_questions)?;
        let request = LlmRequest::new(
            tasks::REVIEW,
            SYSTEM,
            format!(
                "Seniority: {}\nDraft questions:\n{}",
                state.years_required, draft
            ),
        )
        .with_temperature(0.1);
        decode(tasks::REVIEW, self.llm.generate(&request).await?)
    }
}

#[async_trait]
impl Node<InterviewState> for ReviewerNode {
    fn id(&self) -> &str {
        REVIEWING
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        ctx.progress.thought("Reviewing question quality");
        let (score, comment) = match self.review(&state).await {
            Ok(review) => (review.score.clamp(0, 100) as u8, review.comment),
            Err(e) => {
                tracing::warn!(error = %e, "review degraded to fallback score");
                (FALLBACK_SCORE, FALLBACK_COMMENT.to_string())
            }
        };
        ctx.progress
            .thought(format!("Review score {}: {}", score, comment));
        Ok(StateUpdate {
            quality_score: Some(score),
            review_comment: Some(comment),
            ..Default::default()
        })
    }
}
