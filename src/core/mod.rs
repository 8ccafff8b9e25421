// src/core/mod.rs — Prompt optimization pipeline

pub mod anchor;
pub mod classifier;
pub mod engine;
pub mod intent;
pub mod quality;
pub mod repetition;
pub mod types;
