// src/infra/errors.rs — Error types for PromptRepeat

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptRepeatError {
    // Backend errors
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Provider '{provider}' did not answer within {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    // Caller errors
    #[error("No provider configured. Set GEMINI_API_KEY (or GOOGLE_API_KEY).")]
    NoProvider,

    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("Unknown repetition mode '{0}' (expected x2, x3, selective, adaptive or neural-reasoning)")]
    UnknownMode(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PromptRepeatError {
    /// Whether the caller may reasonably retry. The pipeline itself never does.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            PromptRepeatError::Provider {
                retriable: true,
                ..
            } | PromptRepeatError::RateLimited { .. }
                | PromptRepeatError::Timeout { .. }
        )
    }

    /// How long the backend asked callers to wait, when it said.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            PromptRepeatError::RateLimited { retry_after_ms, .. } => {
                Some(Duration::from_millis(*retry_after_ms))
            }
            _ => None,
        }
    }
}
