//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Sends the request's system and user prompt as two messages and parses the
//! reply as one JSON object. Works with any OpenAI-compatible endpoint via
//! `OPENAI_API_BASE`.
//!
//! **Interaction**: Implements `LlmClient`; used by the interview nodes like `MockLlm`.
//! Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::config::LlmSettings;
use crate::error::AgentError;
use crate::llm::{parse_json_reply, LlmClient, LlmRequest};

/// OpenAI Chat Completions client.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config via
/// `ChatOpenAI::with_config` / `ChatOpenAI::from_settings`.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    /// Build client from settings loaded by `LlmSettings::from_env`.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(settings.api_key.clone());
        if let Some(base) = &settings.api_base {
            config = config.with_api_base(base.clone());
        }
        Self::with_config(config, settings.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn generate(&self, request: &LlmRequest) -> Result<serde_json::Value, AgentError> {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                request.system.as_str(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                request.prompt.as_str(),
            )),
        ];
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(messages);
        args.temperature(request.temperature);

        let built = args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })?;

        tracing::debug!(task = %request.task, model = %self.model, "Calling OpenAI");
        let response = self
            .client
            .chat()
            .create(built)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
        })?;
        let content = choice.message.content.unwrap_or_default();
        parse_json_reply(&content)
    }
}
