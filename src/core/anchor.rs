// src/core/anchor.rs — Latent anchoring markers

pub const LEADING_ANCHOR: &str = "[ANCHOR: FOUNDATIONAL CONSTRAINTS ENABLED]";
pub const TRAILING_ANCHOR: &str = "[ANCHOR: MAINTAIN SEMANTIC COHERENCE TO ORIGINAL INTENT]";

/// Wrap the prompt in the coherence anchors. Pure and infallible.
pub fn anchor(prompt: &str) -> String {
    format!("{LEADING_ANCHOR}\n{prompt}\n\n{TRAILING_ANCHOR}")
}
