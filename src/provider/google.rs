// src/provider/google.rs — Google Generative AI (Gemini) provider

use async_trait::async_trait;

use super::{ChatRequest, ChatResponse, ModelProvider, StopReason, TokenUsage};
use crate::infra::errors::PromptRepeatError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GoogleProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the provider at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn provider_error(message: String, retriable: bool) -> PromptRepeatError {
        PromptRepeatError::Provider {
            provider: "google".into(),
            message,
            retriable,
        }
    }

    /// Build the Gemini request body from a ChatRequest.
    fn build_request_body(request: &ChatRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.contents }],
            }],
        })
    }

    /// Pull text, usage and finish reason out of a generateContent response.
    fn parse_response(resp: &serde_json::Value) -> ChatResponse {
        let content: String = resp["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        let usage = TokenUsage {
            input_tokens: token_count(&resp["usageMetadata"]["promptTokenCount"]),
            output_tokens: token_count(&resp["usageMetadata"]["candidatesTokenCount"]),
        };

        let stop_reason = match resp["candidates"][0]["finishReason"].as_str() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") => StopReason::Safety,
            _ => StopReason::Unknown,
        };

        ChatResponse {
            content,
            usage,
            stop_reason,
        }
    }
}

/// Token counts saturate rather than wrap when they exceed `u32`.
fn token_count(value: &serde_json::Value) -> u32 {
    value
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, PromptRepeatError> {
        let body = Self::build_request_body(&request);

        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::provider_error(e.to_string(), e.is_timeout() || e.is_connect()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PromptRepeatError::RateLimited {
                provider: "google".into(),
                retry_after_ms: 5000,
            });
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::provider_error(
                format!("HTTP {}: {}", status, error_body),
                status.is_server_error(),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to parse response: {}", e), false))?;

        Ok(Self::parse_response(&resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: model.into(),
            contents: prompt.into(),
        }
    }

    #[test]
    fn test_request_body_is_single_user_turn() {
        let body = GoogleProvider::build_request_body(&request("m", "hi"));
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }]
            })
        );
    }

    #[test]
    fn test_token_count_saturates() {
        assert_eq!(token_count(&serde_json::json!(12)), 12);
        assert_eq!(token_count(&serde_json::json!(u64::MAX)), u32::MAX);
        assert_eq!(token_count(&serde_json::Value::Null), 0);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let resp = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3 }
        });
        let parsed = GoogleProvider::parse_response(&resp);
        assert_eq!(parsed.content, "Hello, world");
        assert_eq!(parsed.usage.input_tokens, 12);
        assert_eq!(parsed.usage.output_tokens, 3);
        assert!(matches!(parsed.stop_reason, StopReason::EndTurn));
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let parsed = GoogleProvider::parse_response(&serde_json::json!({}));
        assert_eq!(parsed.content, "");
        assert!(matches!(parsed.stop_reason, StopReason::Unknown));
    }

    #[tokio::test]
    async fn test_chat_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "reasoning" }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GoogleProvider::new("secret".into()).with_base_url(server.uri());
        let out = provider.generate("gemini-test", "classify me").await.unwrap();
        assert_eq!(out, "reasoning");
    }

    #[tokio::test]
    async fn test_chat_maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = GoogleProvider::new("k".into()).with_base_url(server.uri());
        let err = provider.chat(request("m", "p")).await.unwrap_err();
        assert!(matches!(err, PromptRepeatError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_chat_maps_server_error_to_retriable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = GoogleProvider::new("k".into()).with_base_url(server.uri());
        let err = provider.chat(request("m", "p")).await.unwrap_err();
        assert!(err.is_retriable());
        assert!(err.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_chat_maps_client_error_to_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad model"))
            .mount(&server)
            .await;

        let provider = GoogleProvider::new("k".into()).with_base_url(server.uri());
        let err = provider.chat(request("m", "p")).await.unwrap_err();
        assert!(!err.is_retriable());
        assert!(matches!(err, PromptRepeatError::Provider { .. }));
    }
}
