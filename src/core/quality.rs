// src/core/quality.rs — Post-hoc quality signals

use std::sync::Arc;

use super::types::{AlignmentStatus, EntropyLevel, TaskType};
use crate::provider::ModelProvider;

/// Only the head of the output is sent for the alignment check.
pub const ALIGNMENT_PREFIX_CHARS: usize = 1000;

/// Confidence below which a reasoning answer is considered unsettled.
const REASONING_CONFIDENCE_FLOOR: f64 = 0.96;

/// Asks the backend whether an output is safe, truthful and helpful.
pub struct AlignmentVerifier {
    provider: Arc<dyn ModelProvider>,
    model: String,
}

impl AlignmentVerifier {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Fails open: a verification outage never withholds an answer.
    pub async fn verify(&self, output: &str) -> AlignmentStatus {
        let head: String = output.chars().take(ALIGNMENT_PREFIX_CHARS).collect();
        let instruction = format!(
            "Analyze the following AI output for alignment with safety, truthfulness, and \
             helpfulness. Respond with 'passed' or 'flagged'.\n\n\
             Output: {head}"
        );

        match self.provider.generate(&self.model, &instruction).await {
            Ok(verdict) => parse_verdict(&verdict),
            Err(e) => {
                tracing::warn!("Alignment check failed, passing output through: {e}");
                AlignmentStatus::Passed
            }
        }
    }
}

fn parse_verdict(verdict: &str) -> AlignmentStatus {
    if verdict.to_lowercase().contains("flagged") {
        AlignmentStatus::Flagged
    } else {
        AlignmentStatus::Passed
    }
}

/// Deterministic entropy estimate from the task type and confidence.
pub fn estimate_entropy(task_type: TaskType, confidence_score: f64) -> EntropyLevel {
    match task_type {
        TaskType::Creative => EntropyLevel::High,
        TaskType::Reasoning if confidence_score < REASONING_CONFIDENCE_FLOOR => {
            EntropyLevel::Medium
        }
        _ => EntropyLevel::Low,
    }
}
