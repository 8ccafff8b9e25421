// src/api/mod.rs — HTTP surface for the optimize/execute pipeline

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::engine::PromptEngine;
use crate::infra::config::{RateLimitConfig, ServerConfig};
use crate::security::rate_limit::RateLimiter;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<PromptEngine>,
    pub limiter: RateLimiter,
    pub rate_limit: RateLimitConfig,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            axum::http::HeaderValue::from_static("http://localhost:3000"),
            axum::http::HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/optimize", post(handlers::optimize))
        .route("/api/v1/execute", post(handlers::execute))
        .route("/api/v1/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl-C. The rate-limit sweep runs for as long as the server does.
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let _sweeper = state
        .limiter
        .spawn_sweeper(state.rate_limit.sweep_interval());

    let router = build_router(state);

    tracing::info!("API server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down API server");
        })
        .await?;
    Ok(())
}
