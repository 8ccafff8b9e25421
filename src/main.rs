// src/main.rs — PromptRepeat entry point

use clap::Parser;
use std::sync::Arc;

use promptrepeat::api::{self, ApiState};
use promptrepeat::cli::{run, Cli, Commands};
use promptrepeat::core::engine::PromptEngine;
use promptrepeat::infra::config::Config;
use promptrepeat::infra::logger;
use promptrepeat::provider::resolver;
use promptrepeat::security::rate_limit::RateLimiter;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        // Optimize needs no key: backend-free modes never call it and the
        // auxiliary stages fall back without one.
        Commands::Optimize(args) => {
            let provider = resolver::discover_provider_or_unconfigured(&config);
            let engine = Arc::new(PromptEngine::new(provider, &config.models));
            run::run_optimize(engine, &args).await
        }
        Commands::Execute(args) => {
            let provider = resolver::discover_provider(&config)?;
            let engine = Arc::new(PromptEngine::new(provider, &config.models));
            run::run_execute(engine, &args).await
        }
        Commands::Serve { host, port } => {
            let provider = resolver::discover_provider(&config)?;
            let engine = Arc::new(PromptEngine::new(provider, &config.models));
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = ApiState {
                engine,
                limiter: RateLimiter::new(),
                rate_limit: config.rate_limit.clone(),
            };
            api::start_server(&config.server, state).await
        }
    }
}
