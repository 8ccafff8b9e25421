// src/core/types.rs — Pipeline value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::infra::errors::PromptRepeatError;

/// How the prompt body is repeated or reinforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepetitionMode {
    #[default]
    X2,
    X3,
    Selective,
    Adaptive,
    NeuralReasoning,
}

impl RepetitionMode {
    pub const ALL: [RepetitionMode; 5] = [
        RepetitionMode::X2,
        RepetitionMode::X3,
        RepetitionMode::Selective,
        RepetitionMode::Adaptive,
        RepetitionMode::NeuralReasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepetitionMode::X2 => "x2",
            RepetitionMode::X3 => "x3",
            RepetitionMode::Selective => "selective",
            RepetitionMode::Adaptive => "adaptive",
            RepetitionMode::NeuralReasoning => "neural-reasoning",
        }
    }

    /// Whether execution runs the draft-then-critique double pass.
    pub fn is_self_correcting(&self) -> bool {
        matches!(self, RepetitionMode::NeuralReasoning)
    }
}

impl fmt::Display for RepetitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepetitionMode {
    type Err = PromptRepeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepetitionMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| PromptRepeatError::UnknownMode(s.to_string()))
    }
}

/// Task category assigned by the classifier. `Unknown` means no
/// classification was attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Reasoning,
    Extraction,
    Creative,
    Classification,
    #[default]
    Unknown,
}

impl TaskType {
    /// Labels the classifier may answer with.
    pub const LABELS: [TaskType; 4] = [
        TaskType::Reasoning,
        TaskType::Extraction,
        TaskType::Creative,
        TaskType::Classification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Reasoning => "reasoning",
            TaskType::Extraction => "extraction",
            TaskType::Creative => "creative",
            TaskType::Classification => "classification",
            TaskType::Unknown => "unknown",
        }
    }

    /// Parse a classifier label. Only the four real categories match.
    pub fn from_label(label: &str) -> Option<Self> {
        TaskType::LABELS
            .into_iter()
            .find(|task| task.as_str() == label)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request pipeline options. Unset toggles are off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationOptions {
    pub mode: RepetitionMode,
    /// Explicit segments for `selective` mode when the prompt has no markers.
    pub segments: Vec<String>,
    /// Generation model; the configured default applies when unset.
    pub model: Option<String>,
    pub enable_alignment: bool,
    pub enable_intent_expansion: bool,
    pub enable_entropy_monitoring: bool,
    pub enable_latent_anchoring: bool,
}

impl OptimizationOptions {
    pub fn with_mode(mode: RepetitionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub mode: RepetitionMode,
    /// Wall-clock duration of the optimize stage only.
    pub latency_ms: u64,
    pub task_type: TaskType,
    /// Advisory strength metric, not a copy count.
    pub repetition_count: f64,
    pub intent_expanded: bool,
    pub anchors_applied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentStatus {
    #[default]
    Passed,
    Flagged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(flatten)]
    pub optimization: OptimizationResult,
    pub output: String,
    pub alignment_status: AlignmentStatus,
    pub confidence_score: f64,
    pub entropy_level: EntropyLevel,
}
