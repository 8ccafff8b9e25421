// src/provider/resolver.rs — Backend discovery from the environment

use std::sync::Arc;

use async_trait::async_trait;

use super::google::GoogleProvider;
use super::timeout::TimeoutProvider;
use super::{ChatRequest, ChatResponse, ModelProvider};
use crate::infra::config::Config;
use crate::infra::errors::PromptRepeatError;

/// Env vars checked for a Gemini key, in order.
const GEMINI_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Find the first non-empty Gemini key using `lookup` for env access.
fn find_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    GEMINI_KEY_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Build the backend from env vars, bounded by the configured timeout.
pub fn discover_provider(config: &Config) -> Result<Arc<dyn ModelProvider>, PromptRepeatError> {
    let key = find_key(|var| std::env::var(var).ok()).ok_or(PromptRepeatError::NoProvider)?;
    Ok(build_provider(key, config))
}

/// Like [`discover_provider`], but without a key every call fails with
/// `NoProvider` instead of the lookup itself failing. Stages that fall back
/// on backend errors still produce a result.
pub fn discover_provider_or_unconfigured(config: &Config) -> Arc<dyn ModelProvider> {
    match find_key(|var| std::env::var(var).ok()) {
        Some(key) => build_provider(key, config),
        None => {
            tracing::debug!("no backend key found, auxiliary stages will fall back");
            Arc::new(Unconfigured)
        }
    }
}

fn build_provider(key: String, config: &Config) -> Arc<dyn ModelProvider> {
    let google: Arc<dyn ModelProvider> = Arc::new(GoogleProvider::new(key));

    tracing::debug!(
        provider = google.id(),
        timeout_secs = config.llm.timeout_seconds,
        "backend resolved"
    );

    Arc::new(TimeoutProvider::with_timeout(
        google,
        config.llm.timeout(),
    ))
}

/// Stand-in backend when no key is configured.
pub struct Unconfigured;

#[async_trait]
impl ModelProvider for Unconfigured {
    fn id(&self) -> &str {
        "unconfigured"
    }

    fn name(&self) -> &str {
        "Unconfigured"
    }

    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, PromptRepeatError> {
        Err(PromptRepeatError::NoProvider)
    }
}
