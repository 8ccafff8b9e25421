// src/lib.rs — Library root for PromptRepeat

pub mod api;
pub mod cli;
pub mod core;
pub mod infra;
pub mod provider;
pub mod security;
