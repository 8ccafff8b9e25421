// src/core/engine.rs — Optimize and Execute entry points

use std::sync::Arc;
use std::time::Instant;

use super::anchor;
use super::classifier::TaskClassifier;
use super::intent::IntentExpander;
use super::quality::{self, AlignmentVerifier};
use super::repetition;
use super::types::*;
use crate::infra::config::ModelsConfig;
use crate::infra::errors::PromptRepeatError;
use crate::provider::ModelProvider;

/// Fixed confidence reported for a single generation pass.
pub const SINGLE_PASS_CONFIDENCE: f64 = 0.95;
/// Fixed confidence reported after the draft-and-critique double pass.
pub const SELF_CORRECTED_CONFIDENCE: f64 = 0.98;

/// Drives the optimization pipeline and the generation call(s) behind it.
///
/// Auxiliary stages (classification, intent expansion, alignment) degrade to
/// fallback values on backend failure. Generation calls do not: their errors
/// are returned to the caller untouched.
pub struct PromptEngine {
    provider: Arc<dyn ModelProvider>,
    default_model: String,
    classifier: TaskClassifier,
    expander: IntentExpander,
    verifier: AlignmentVerifier,
}

impl PromptEngine {
    pub fn new(provider: Arc<dyn ModelProvider>, models: &ModelsConfig) -> Self {
        Self {
            classifier: TaskClassifier::new(provider.clone(), models.utility.clone()),
            expander: IntentExpander::new(provider.clone(), models.utility.clone()),
            verifier: AlignmentVerifier::new(provider.clone(), models.utility.clone()),
            default_model: models.default.clone(),
            provider,
        }
    }

    /// Rewrite `prompt` according to `options`. Never fails; auxiliary
    /// backend calls fall back as documented on each stage.
    pub async fn optimize(
        &self,
        prompt: &str,
        options: &OptimizationOptions,
    ) -> OptimizationResult {
        let start = Instant::now();
        let mut working = prompt.to_string();

        let intent_expanded = options.enable_intent_expansion;
        if intent_expanded {
            working = self.expander.expand(&working).await;
            tracing::debug!(chars = working.chars().count(), "intent expansion done");
        }

        let anchors_applied = options.enable_latent_anchoring;
        if anchors_applied {
            working = anchor::anchor(&working);
        }

        let task = if options.mode == RepetitionMode::Adaptive {
            let task = self.classifier.classify(&working).await;
            tracing::debug!(task = %task, "prompt classified");
            task
        } else {
            TaskType::Unknown
        };

        let transformed = repetition::transform(&working, options.mode, &options.segments, task);
        let latency_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;

        tracing::debug!(
            mode = %options.mode,
            repetition_count = transformed.repetition_count,
            latency_ms,
            "prompt optimized"
        );

        OptimizationResult {
            original_prompt: prompt.to_string(),
            optimized_prompt: transformed.text,
            mode: options.mode,
            latency_ms,
            task_type: transformed.task_type,
            repetition_count: transformed.repetition_count,
            intent_expanded,
            anchors_applied,
        }
    }

    /// Optimize, generate, then score. Fails only when a generation call fails.
    pub async fn execute(
        &self,
        prompt: &str,
        options: &OptimizationOptions,
    ) -> Result<ExecutionResult, PromptRepeatError> {
        let optimization = self.optimize(prompt, options).await;
        let model = self.resolve_model(options);

        let (output, confidence_score) = if options.mode.is_self_correcting() {
            let draft = self
                .provider
                .generate(model, &optimization.optimized_prompt)
                .await?;
            tracing::debug!(model, "draft generated, running critical review");
            let corrected = self
                .provider
                .generate(model, &critique_prompt(prompt, &draft))
                .await?;
            (corrected, SELF_CORRECTED_CONFIDENCE)
        } else {
            let output = self
                .provider
                .generate(model, &optimization.optimized_prompt)
                .await?;
            (output, SINGLE_PASS_CONFIDENCE)
        };

        let alignment_status = if options.enable_alignment {
            self.verifier.verify(&output).await
        } else {
            AlignmentStatus::Passed
        };

        let entropy_level = if options.enable_entropy_monitoring {
            quality::estimate_entropy(optimization.task_type, confidence_score)
        } else {
            EntropyLevel::Low
        };

        Ok(ExecutionResult {
            optimization,
            output,
            alignment_status,
            confidence_score,
            entropy_level,
        })
    }

    fn resolve_model<'a>(&'a self, options: &'a OptimizationOptions) -> &'a str {
        options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.default_model.as_str())
    }
}

/// Second-pass instruction for self-correction. Built from the caller's
/// original prompt, not the optimized one.
fn critique_prompt(original: &str, draft: &str) -> String {
    format!(
        "Original Task: {original}\n\n\
         Initial Draft: {draft}\n\n\
         [CRITICAL REVIEW]: Identify any logical flaws, factual errors, or missing constraints \
         in the draft above. Provide the corrected, final response."
    )
}
