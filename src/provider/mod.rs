// src/provider/mod.rs — Model provider layer

pub mod google;
pub mod resolver;
pub mod timeout;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::PromptRepeatError;

/// Core trait that all model backends implement.
///
/// The pipeline only ever needs `generate`: one prompt in, one text out.
/// `chat` is the backend-facing primitive it is built on.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, PromptRepeatError>;

    /// Generate text for a single prompt with the given model.
    async fn generate(&self, model: &str, contents: &str) -> Result<String, PromptRepeatError> {
        let response = self
            .chat(ChatRequest {
                model: model.to_string(),
                contents: contents.to_string(),
            })
            .await?;

        tracing::debug!(
            provider = self.id(),
            model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            total_tokens = response.usage.total(),
            "generation complete"
        );
        if matches!(response.stop_reason, StopReason::MaxTokens) {
            tracing::warn!(provider = self.id(), model, "output truncated at max tokens");
        }

        Ok(response.content)
    }
}

/// A single-turn request: one user prompt for one model.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub model: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub stop_reason: StopReason,
}

impl ChatResponse {
    /// A plain text response with no usage information.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            stop_reason: StopReason::EndTurn,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Safety,
    #[default]
    Unknown,
}
