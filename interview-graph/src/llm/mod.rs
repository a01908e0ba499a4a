//! Structured-generation client used by the interview steps.
//!
//! Each step sends one [`LlmRequest`] (task name, system and user prompt,
//! temperature) and expects a single JSON object back. Retries and timeouts
//! are the client's concern, never the engine's.

mod mock;

#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;

#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AgentError;

/// One structured-generation call.
///
/// **Interaction**: Built by the interview nodes; consumed by `LlmClient::generate`.
/// `task` names the kind of call (e.g. `parse_jd`) so test doubles can answer per task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmRequest {
    pub task: String,
    pub system: String,
    pub prompt: String,
    /// 0–2. Lower values are more deterministic.
    pub temperature: f32,
}

impl LlmRequest {
    pub fn new(task: impl Into<String>, system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            system: system.into(),
            prompt: prompt.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Structured-generation client: prompt in, one JSON object out.
///
/// Implementations: `MockLlm` (canned replies per task), `ChatOpenAI` (real API, feature `openai`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: &LlmRequest) -> Result<serde_json::Value, AgentError>;
}

/// Parses a model reply as a JSON object, tolerating a surrounding Markdown code fence.
pub fn parse_json_reply(text: &str) -> Result<serde_json::Value, AgentError> {
    let trimmed = text.trim();
    let body = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    };
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(AgentError::InvalidOutput(format!(
            "expected a JSON object, got: {}",
            body
        )));
    }
    Ok(value)
}
