// src/api/handlers.rs

use crate::api::{types::*, ApiState};
use crate::core::types::{ExecutionResult, OptimizationResult};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

/// Namespace shared by both pipeline routes: they draw on the same budget.
const RATE_LIMIT_SCOPE: &str = "optimize";

/// Caller identity for rate limiting: first `x-forwarded-for` hop.
pub fn caller_key(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown");
    format!("{RATE_LIMIT_SCOPE}:{ip}")
}

/// Consult the limiter before anything else, body validation included.
fn admit(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
    let key = caller_key(headers);
    let result = state.limiter.check(
        &key,
        state.rate_limit.limit,
        state.rate_limit.window_seconds,
    );
    if result.allowed {
        Ok(())
    } else {
        tracing::info!(key = %key, reset_in = result.reset_in_seconds, "request rate limited");
        Err(ApiError::rate_limited(&result))
    }
}

/// POST /api/v1/optimize — Rewrite a prompt without generating.
pub async fn optimize(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<PromptRequest>,
) -> Result<Json<OptimizationResult>, ApiError> {
    admit(&state, &headers)?;
    let prompt = body
        .prompt()
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?;

    let result = state.engine.optimize(prompt, &body.options).await;
    Ok(Json(result))
}

/// POST /api/v1/execute — Rewrite a prompt, generate, and score the output.
pub async fn execute(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<PromptRequest>,
) -> Result<Json<ExecutionResult>, ApiError> {
    admit(&state, &headers)?;
    let prompt = body
        .prompt()
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?;

    match state.engine.execute(prompt, &body.options).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::error!(
                mode = %body.options.mode,
                retriable = e.is_retriable(),
                "Execution failed: {e}"
            );
            Err(ApiError::from_failure(&e))
        }
    }
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
