// src/cli/run.rs — One-shot optimize/execute commands

use std::io::Read;
use std::sync::Arc;

use super::PromptArgs;
use crate::core::engine::PromptEngine;
use crate::infra::errors::PromptRepeatError;

/// Resolve the prompt from args and/or stdin. With `--stdin` and args,
/// the args are the instruction and stdin is the content.
pub fn read_prompt(args: &PromptArgs) -> anyhow::Result<String> {
    let from_args = args.prompt.join(" ");
    let prompt = if args.stdin {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        combine(&from_args, &content)
    } else {
        from_args
    };

    if prompt.trim().is_empty() {
        return Err(PromptRepeatError::EmptyPrompt.into());
    }
    Ok(prompt)
}

fn combine(instruction: &str, content: &str) -> String {
    if instruction.trim().is_empty() {
        content.to_string()
    } else {
        format!("{instruction}\n\n---\n\n{content}")
    }
}

/// `promptrepeat optimize`: print the optimization result as JSON.
pub async fn run_optimize(engine: Arc<PromptEngine>, args: &PromptArgs) -> anyhow::Result<()> {
    let prompt = read_prompt(args)?;
    let result = engine.optimize(&prompt, &args.options()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// `promptrepeat execute`: print the execution result as JSON.
pub async fn run_execute(engine: Arc<PromptEngine>, args: &PromptArgs) -> anyhow::Result<()> {
    let prompt = read_prompt(args)?;
    let result = engine.execute(&prompt, &args.options()).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
