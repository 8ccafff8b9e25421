// src/cli/mod.rs — CLI definition (clap derive)

pub mod run;

use clap::{Args, Parser, Subcommand};

use crate::core::types::{OptimizationOptions, RepetitionMode};

#[derive(Parser)]
#[command(
    name = "promptrepeat",
    about = "Prompt repetition and reinforcement middleware",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite a prompt and print the result without generating
    Optimize(PromptArgs),
    /// Rewrite a prompt, generate a response and score it
    Execute(PromptArgs),
    /// Serve the HTTP API
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Args, Clone, Debug)]
pub struct PromptArgs {
    /// Prompt text (joined with spaces)
    #[arg(trailing_var_arg = true)]
    pub prompt: Vec<String>,

    /// Read the prompt from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Repetition mode: x2, x3, selective, adaptive, neural-reasoning
    #[arg(long, default_value = "x2")]
    pub mode: RepetitionMode,

    /// Segment to reinforce in selective mode (repeatable)
    #[arg(long = "segment")]
    pub segments: Vec<String>,

    /// Generation model (defaults to models.default from config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Rewrite the prompt with expanded intent first
    #[arg(long)]
    pub intent: bool,

    /// Wrap the prompt in leading and trailing anchors
    #[arg(long)]
    pub anchor: bool,

    /// Check the generated output for alignment issues
    #[arg(long)]
    pub alignment: bool,

    /// Report an entropy estimate for the output
    #[arg(long)]
    pub entropy: bool,
}

impl PromptArgs {
    pub fn options(&self) -> OptimizationOptions {
        OptimizationOptions {
            mode: self.mode,
            segments: self.segments.clone(),
            model: self.model.clone(),
            enable_alignment: self.alignment,
            enable_intent_expansion: self.intent,
            enable_entropy_monitoring: self.entropy,
            enable_latent_anchoring: self.anchor,
        }
    }
}
