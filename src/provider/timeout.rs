// src/provider/timeout.rs — Upper bound on backend latency
//
// Wraps any ModelProvider so that no single call can hang a request. An
// elapsed deadline surfaces as PromptRepeatError::Timeout, which callers
// treat like any other backend failure. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider};
use crate::infra::errors::PromptRepeatError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TimeoutProvider {
    inner: Arc<dyn ModelProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn ModelProvider>) -> Self {
        Self {
            inner,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(inner: Arc<dyn ModelProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl ModelProvider for TimeoutProvider {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, PromptRepeatError> {
        match tokio::time::timeout(self.timeout, self.inner.chat(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    provider = self.inner.id(),
                    timeout_secs = self.timeout.as_secs(),
                    "backend call exceeded deadline"
                );
                Err(PromptRepeatError::Timeout {
                    provider: self.inner.id().to_string(),
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}
