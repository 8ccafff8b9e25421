// src/core/repetition.rs — Mode state machine: repetition and reinforcement
//
// Every mode is a pure function of the (already expanded/anchored) prompt.
// Adaptive mode consumes a task classification made beforehand by the engine,
// so nothing in this module touches the network.

use regex::Regex;
use std::sync::OnceLock;

use super::types::{RepetitionMode, TaskType};

/// Extraction/classification prompts shorter than this get three copies.
pub const SHORT_PROMPT_CHARS: usize = 300;

const SEPARATOR: &str = "\n\n";

const KEY_INSTRUCTIONS_HEADER: &str = "\n\nREPEATED KEY INSTRUCTIONS:\n";
const SEGMENTS_HEADER: &str = "\n\nREPEATED SEGMENTS:\n";

const LOGICAL_ANCHORING: &str = "[REINFORCEMENT: LOGICAL ANCHORING]\n\
    Carefully analyze the constraints provided in the initial prompt. Ensure every step of your \
    reasoning is explicitly linked to these constraints. Avoid logical leaps and verify your final \
    conclusion against the original requirements for absolute consistency.";

const CREATIVE_ANCHOR: &str = "[CREATIVE ANCHOR: MAINTAIN NARRATIVE COHERENCE]";
const CREATIVE_INSTRUCTION: &str = "[INSTRUCTION: Expand on the implicit themes while adhering \
    strictly to the stylistic constraints defined above.]";

const DEEP_REASONING_MARKER: &str = "[SYSTEM: DEEP REASONING MODE ENABLED]";
const DEEP_REASONING_INSTRUCTION: &str = "[INSTRUCTION: Think step-by-step. Analyze your own logic \
    for contradictions. Verify every claim before finalizing.]";

/// Each marked segment adds this much to the repetition strength.
const SEGMENT_WEIGHT: f64 = 0.2;

/// Output of a single mode transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub text: String,
    pub repetition_count: f64,
    /// The classification adaptive mode branched on; `Unknown` elsewhere.
    pub task_type: TaskType,
}

impl Transform {
    fn new(text: String, repetition_count: f64) -> Self {
        Self {
            text,
            repetition_count,
            task_type: TaskType::Unknown,
        }
    }
}

fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"\[\[(.*?)\]\]").expect("marker pattern is valid"))
}

/// Apply `mode` to `prompt`. `task` is only consulted by adaptive mode.
pub fn transform(
    prompt: &str,
    mode: RepetitionMode,
    segments: &[String],
    task: TaskType,
) -> Transform {
    match mode {
        RepetitionMode::X2 => x2(prompt),
        RepetitionMode::X3 => x3(prompt),
        RepetitionMode::Selective => selective(prompt, segments),
        RepetitionMode::Adaptive => adaptive(prompt, task),
        RepetitionMode::NeuralReasoning => neural_reasoning(prompt),
    }
}

fn repeat(prompt: &str, copies: usize) -> String {
    vec![prompt; copies].join(SEPARATOR)
}

pub fn x2(prompt: &str) -> Transform {
    Transform::new(repeat(prompt, 2), 2.0)
}

pub fn x3(prompt: &str) -> Transform {
    Transform::new(repeat(prompt, 3), 3.0)
}

/// Repeat only what matters: `[[...]]` markers first, explicit segments
/// second, plain x2 when there is neither.
pub fn selective(prompt: &str, segments: &[String]) -> Transform {
    let marked: Vec<&str> = marker_regex()
        .captures_iter(prompt)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();

    if !marked.is_empty() {
        let cleaned = marker_regex().replace_all(prompt, "$1");
        let mut block = String::from(KEY_INSTRUCTIONS_HEADER);
        for segment in &marked {
            block.push_str("- ");
            block.push_str(segment);
            block.push('\n');
        }
        let text = format!("{cleaned}{block}{block}");
        return Transform::new(text, segment_strength(marked.len()));
    }

    if !segments.is_empty() {
        let mut block = String::from(SEGMENTS_HEADER);
        for segment in segments {
            block.push_str(segment);
            block.push('\n');
        }
        return Transform::new(format!("{prompt}{block}"), segment_strength(segments.len()));
    }

    x2(prompt)
}

fn segment_strength(count: usize) -> f64 {
    1.0 + count as f64 * SEGMENT_WEIGHT
}

/// Branch on the task category the classifier assigned.
pub fn adaptive(prompt: &str, task: TaskType) -> Transform {
    let mut out = match task {
        TaskType::Extraction | TaskType::Classification => {
            if prompt.chars().count() < SHORT_PROMPT_CHARS {
                x3(prompt)
            } else {
                x2(prompt)
            }
        }
        TaskType::Reasoning => Transform::new(
            format!("{prompt}{SEPARATOR}{LOGICAL_ANCHORING}"),
            1.1,
        ),
        TaskType::Creative => Transform::new(
            format!("{CREATIVE_ANCHOR}\n{prompt}{SEPARATOR}{CREATIVE_INSTRUCTION}"),
            1.2,
        ),
        TaskType::Unknown => x2(prompt),
    };
    out.task_type = task;
    out
}

pub fn neural_reasoning(prompt: &str) -> Transform {
    Transform::new(
        format!("{DEEP_REASONING_MARKER}\n{prompt}{SEPARATOR}{DEEP_REASONING_INSTRUCTION}"),
        1.0,
    )
}
