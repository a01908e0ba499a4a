use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::{LlmClient, LlmRequest};
use crate::state::{InterviewState, StateUpdate};

use super::{decode, string_or_number};
use crate::interview::{tasks, PARSING};

const SYSTEM: &str = "You are a recruiting expert. Extract the key facts of a job description. \
Reply with a single JSON object with keys: company_name (string, empty if unknown), \
tech_stack (array of strings), years_required (string), soft_skills (array of strings), \
core_responsibility (string).";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JdMeta {
    company_name: String,
    tech_stack: Vec<String>,
    #[serde(deserialize_with = "string_or_number")]
    years_required: String,
    soft_skills: Vec<String>,
    core_responsibility: String,
}

/// Extracts company, stack, seniority and soft skills from the job description.
///
/// Failure is fatal: every later step depends on this output.
pub struct ParserNode {
    llm: Arc<dyn LlmClient>,
}

impl ParserNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<InterviewState> for ParserNode {
    fn id(&self) -> &str {
        PARSING
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        ctx.progress.thought("Analysing the job description");
        let request = LlmRequest::new(
            tasks::PARSE_JD,
            SYSTEM,
            format!("Job description:\n{}", state.jd_text),
        );
        let meta: JdMeta = decode(tasks::PARSE_JD, self.llm.generate(&request).await?)?;
        ctx.progress.thought(format!(
            "Found {} stack item(s) for {}",
            meta.tech_stack.len(),
            if meta.company_name.is_empty() {
                "an unnamed company"
            } else {
                meta.company_name.as_str()
            }
        ));
        Ok(StateUpdate {
            company_name: Some(meta.company_name),
            tech_stack: Some(meta.tech_stack),
            years_required: Some(meta.years_required),
            soft_skills: Some(meta.soft_skills),
            core_responsibility: Some(meta.core_responsibility),
            ..Default::default()
        })
    }
}
