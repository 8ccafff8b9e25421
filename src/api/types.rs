// src/api/types.rs

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::types::OptimizationOptions;
use crate::infra::errors::PromptRepeatError;
use crate::security::rate_limit::{ceil_secs, RateLimitResult};

/// Shown to callers when generation fails. The cause is logged, not returned.
pub const GENERIC_FAILURE: &str = "Optimization failed. Please try again.";

/// Request body for both pipeline routes: the prompt plus flattened options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(flatten)]
    pub options: OptimizationOptions,
}

impl PromptRequest {
    /// The prompt, if it has any non-whitespace content.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned from handlers; renders as JSON with an optional Retry-After.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: GENERIC_FAILURE.into(),
            retry_after_secs: None,
        }
    }

    /// Map a pipeline failure. Transient backend trouble is a 503 the caller
    /// may retry; anything else is a 500. Both carry only the generic message.
    pub fn from_failure(err: &PromptRepeatError) -> Self {
        if err.is_retriable() {
            Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: GENERIC_FAILURE.into(),
                retry_after_secs: err.retry_after().map(ceil_secs),
            }
        } else {
            Self::internal()
        }
    }

    pub fn rate_limited(result: &RateLimitResult) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: result.retry_message(),
            retry_after_secs: Some(result.reset_in_seconds),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response();

        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
