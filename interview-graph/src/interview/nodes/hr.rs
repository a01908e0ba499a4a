use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::interview::{tasks, HR_DRAFTING};
use crate::llm::{LlmClient, LlmRequest};
use crate::state::{InterviewState, StateUpdate};

use super::{bullet_list, decode, shape_questions, QuestionList};

pub const HR_QUESTION_COUNT: usize = 2;

/// Used when the job description names no soft skills.
const DEFAULT_SOFT_SKILLS: [&str; 2] = ["communication", "resilience under pressure"];

const SYSTEM: &str = "You are an experienced HR interviewer. Write behavioural questions built \
on the STAR method (situation, task, action, result), tied to the company culture when \
background is given. Reply with a single JSON object: {\"questions\": [{\"category\": \
\"HR/Behavioral\", \"question\": string, \"reference_answer\": string}]}.";

/// Drafts the behavioural questions from the soft skills and any company background.
pub struct HrNode {
    llm: Arc<dyn LlmClient>,
}

impl HrNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<InterviewState> for HrNode {
    fn id(&self) -> &str {
        HR_DRAFTING
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        ctx.progress.thought("Drafting behavioural questions");
        let skills = if state.soft_skills.is_empty() {
            DEFAULT_SOFT_SKILLS.iter().map(|s| s.to_string()).collect()
        } else {
            state.soft_skills.clone()
        };
        let mut prompt = format!(
            "Soft skills required: {}\nWrite {} behavioural interview questions.",
            bullet_list(&skills),
            HR_QUESTION_COUNT
        );
        if !state.company_info.is_empty() {
            prompt.push_str(&format!("\nCompany background: {}", state.company_info));
        }
        let request = LlmRequest::new(tasks::DRAFT_HR, SYSTEM, prompt).with_temperature(0.8);
        let reply: QuestionList = decode(tasks::DRAFT_HR, self.llm.generate(&request).await?)?;
        let questions =
            shape_questions(tasks::DRAFT_HR, reply.questions, HR_QUESTION_COUNT, "HR/Behavioral")?;
        Ok(StateUpdate {
            hr_questions: Some(questions),
            ..Default::default()
        })
    }
}
