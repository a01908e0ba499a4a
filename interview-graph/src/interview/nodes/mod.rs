//! Interview pipeline steps.
//!
//! Each node makes at most one structured-generation call through
//! [`LlmClient`](crate::llm::LlmClient), emits progress thoughts on the run's
//! sender, and returns a [`StateUpdate`](crate::state::StateUpdate) with only
//! the fields it owns.

mod hr;
mod human;
mod parser;
mod researcher;
mod reviewer;
mod tech_lead;

pub use hr::HrNode;
pub use human::HumanReviewNode;
pub use parser::ParserNode;
pub use researcher::ResearcherNode;
pub use reviewer::ReviewerNode;
pub use tech_lead::TechLeadNode;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::AgentError;
use crate::state::Question;

/// Decodes a generation reply into `T`, mapping shape mismatches to `InvalidOutput`.
fn decode<T: DeserializeOwned>(task: &str, value: serde_json::Value) -> Result<T, AgentError> {
    serde_json::from_value(value)
        .map_err(|e| AgentError::InvalidOutput(format!("{} reply: {}", task, e)))
}

#[derive(Debug, Deserialize)]
struct QuestionList {
    #[serde(default)]
    questions: Vec<Question>,
}

/// Keeps at most `count` non-blank questions and fills a missing category.
fn shape_questions(
    task: &str,
    questions: Vec<Question>,
    count: usize,
    category: &str,
) -> Result<Vec<Question>, AgentError> {
    let shaped: Vec<Question> = questions
        .into_iter()
        .filter(|q| !q.question.trim().is_empty())
        .take(count)
        .map(|mut q| {
            if q.category.trim().is_empty() {
                q.category = category.to_string();
            }
            q
        })
        .collect();
    if shaped.is_empty() {
        return Err(AgentError::InvalidOutput(format!("{} reply has no questions", task)));
    }
    Ok(shaped)
}

/// Accepts a JSON string or number (models answer `"5"` and `5` alike).
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none stated)".to_string()
    } else {
        items.join(", ")
    }
}
