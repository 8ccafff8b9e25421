// src/core/intent.rs — Intent expansion (fails open)

use std::sync::Arc;

use crate::provider::ModelProvider;

/// Rewrites a prompt with its implicit goals and constraints spelled out.
pub struct IntentExpander {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl IntentExpander {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Best effort. Any failure, or an empty answer, returns the prompt unchanged.
    pub async fn expand(&self, prompt: &str) -> String {
        let instruction = format!(
            "Analyze the user's intent in this prompt and expand it with necessary context, \
             constraints, and implicit goals to ensure the LLM has a foundational understanding. \
             Respond with ONLY the expanded prompt.\n\n\
             Original Prompt: {prompt}"
        );

        match self.provider.generate(&self.model, &instruction).await {
            Ok(expanded) if !expanded.trim().is_empty() => expanded,
            Ok(_) => {
                tracing::debug!("intent expansion returned nothing, keeping original prompt");
                prompt.to_string()
            }
            Err(e) => {
                tracing::warn!("Intent expansion failed, keeping original prompt: {e}");
                prompt.to_string()
            }
        }
    }
}
