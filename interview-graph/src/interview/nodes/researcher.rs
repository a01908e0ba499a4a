use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::interview::{tasks, RESEARCHING};
use crate::llm::{LlmClient, LlmRequest};
use crate::state::{InterviewState, StateUpdate};

use super::decode;

/// Written when the job description names no company.
pub const RESEARCH_SKIPPED: &str = "No specific company identified; background research skipped.";

/// Prefix of the note written when research fails.
pub const RESEARCH_UNAVAILABLE: &str = "Company research unavailable";

const SYSTEM: &str = "You are a business analyst. Summarise what a candidate should know about \
the company: products, recent news, financial position, engineering culture. Reply with a \
single JSON object: {\"summary\": string}.";

#[derive(Debug, Deserialize)]
struct Summary {
    summary: String,
}

/// Researches the company background.
///
/// Never fails the run: a missing company name or a failed call degrades to a
/// fixed note in `company_info`.
pub struct ResearcherNode {
    llm: Arc<dyn LlmClient>,
}

impl ResearcherNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn research(&self, company: &str) -> Result<String, AgentError> {
        let request = LlmRequest::new(
            tasks::RESEARCH_COMPANY,
            SYSTEM,
            format!("Company: {}", company),
        )
        .with_temperature(0.5);
        let reply: Summary = decode(
            tasks::RESEARCH_COMPANY,
            self.llm.generate(&request).await?,
        )?;
        Ok(reply.summary)
    }
}

#[async_trait]
impl Node<InterviewState> for ResearcherNode {
    fn id(&self) -> &str {
        RESEARCHING
    }

    async fn run(&self, state: InterviewState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let company = state.company_name.trim();
        let info = if company.is_empty() {
            ctx.progress.thought("No company named; skipping background research");
            RESEARCH_SKIPPED.to_string()
        } else {
            ctx.progress
                .thought(format!("Researching company background: {}", company));
            match self.research(company).await {
                Ok(summary) if !summary.trim().is_empty() => summary,
                Ok(_) => format!("{}: empty summary", RESEARCH_UNAVAILABLE),
                Err(e) => {
                    tracing::warn!(company, error = %e, "company research degraded");
                    format!("{}: {}", RESEARCH_UNAVAILABLE, e)
                }
            }
        };
        Ok(StateUpdate {
            company_info: Some(info),
            ..Default::default()
        })
    }
}
