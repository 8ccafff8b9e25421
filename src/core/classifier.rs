// src/core/classifier.rs — Task classification (fails closed)

use std::sync::Arc;

use super::types::TaskType;
use crate::provider::ModelProvider;

/// Only the opening of the prompt is sent for classification.
pub const CLASSIFY_PREFIX_CHARS: usize = 500;

/// Labels a prompt with one of the four task categories via one backend call.
pub struct TaskClassifier {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl TaskClassifier {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Never fails: an unusable answer or a backend error yields `Classification`.
    pub async fn classify(&self, prompt: &str) -> TaskType {
        let instruction = classification_prompt(prompt);

        match self.provider.generate(&self.model, &instruction).await {
            Ok(answer) => parse_label(&answer).unwrap_or_else(|| {
                tracing::debug!(answer = %answer.trim(), "unrecognised task label, defaulting");
                TaskType::Classification
            }),
            Err(e) => {
                tracing::warn!("Classification failed, defaulting to classification: {e}");
                TaskType::Classification
            }
        }
    }
}

fn classification_prompt(prompt: &str) -> String {
    let head: String = prompt.chars().take(CLASSIFY_PREFIX_CHARS).collect();
    format!(
        "Classify the following prompt into one of these categories: reasoning, extraction, \
         creative, classification. Respond with ONLY the category name.\n\n\
         Prompt: {head}"
    )
}

fn parse_label(answer: &str) -> Option<TaskType> {
    TaskType::from_label(&answer.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_truncated_to_prefix() {
        let long = "a".repeat(800);
        let instruction = classification_prompt(&long);
        let tail = instruction.rsplit("Prompt: ").next().unwrap();
        assert_eq!(tail.chars().count(), CLASSIFY_PREFIX_CHARS);
    }

    #[test]
    fn test_prefix_counts_chars_not_bytes() {
        let long = "é".repeat(600);
        let instruction = classification_prompt(&long);
        let tail = instruction.rsplit("Prompt: ").next().unwrap();
        assert_eq!(tail.chars().count(), CLASSIFY_PREFIX_CHARS);
    }

    #[test]
    fn test_parse_label_normalises() {
        assert_eq!(parse_label("  Reasoning\n"), Some(TaskType::Reasoning));
        assert_eq!(parse_label("EXTRACTION"), Some(TaskType::Extraction));
        assert_eq!(parse_label("creative."), None);
        assert_eq!(parse_label("unknown"), None);
        assert_eq!(parse_label(""), None);
    }
}
