use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::interview::{tasks, TECH_DRAFTING};
use crate::llm::{LlmClient, LlmRequest};
use crate::state::{InterviewState, StateUpdate};

use super::{bullet_list, decode, shape_questions, QuestionList};

/// Technical questions per draft.
pub const TECH_QUESTION_COUNT: usize = 3;

const SYSTEM: &str = "You are a senior technical interviewer. Write challenging questions that \
test fundamentals and real-world troubleshooting, each with concise reference answer points. \
Reply with a single JSON object: {\"questions\": [{\"category\": \"Technical\", \"question\": \
string, \"reference_answer\": string}]}.";

/// Drafts the technical questions; one run per revision pass.
///
/// Reads the last review comment and any human feedback, bumps
/// `iteration_count` by one and clears `human_feedback` once consumed.
pub struct TechLeadNode {
    llm: Arc<dyn LlmClient>,
}

impl TechLeadNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn prompt(state: &InterviewState) -> String {
        let mut prompt = format!(
            "Tech stack: {}\nExperience required: {}\nCore responsibility: {}\n\
             Write {} technical interview questions.",
            bullet_list(&state.tech_stack),
            state.years_required,
            state.core_responsibility,
            TECH_QUESTION_COUNT
        );
        if state.iteration_count > 0 && !state.review_comment.is_empty() {
            prompt.push_str(&format!(
                "\nThe previous draft was reviewed: {}",
                state.review_comment
            ));
        }
        if let Some(feedback) = &state.human_feedback {
            prompt.push_str(&format!("\nReviewer instruction: {}", feedback));
        }
        prompt
    }
}

#[async_trait]
impl Node<InterviewState> for TechLeadNode {
    fn id(&self) -> &str {
        TECH_DRAFTING
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let version = state.iteration_count + 1;
        ctx.progress
            .thought(format!("Drafting technical questions (v{})", version));
        let request = LlmRequest::new(tasks::DRAFT_TECH, SYSTEM, Self::prompt(&state))
            .with_temperature(0.7);
        let reply: QuestionList = decode(tasks::DRAFT_TECH, self.llm.generate(&request).await?)?;
        let questions =
            shape_questions(tasks::DRAFT_TECH, reply.questions, TECH_QUESTION_COUNT, "Technical")?;
        Ok(StateUpdate {
            tech_questions: Some(questions),
            iteration_count: Some(version),
            human_feedback: Some(None),
            ..Default::default()
        })
    }
}
