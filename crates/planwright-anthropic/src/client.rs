// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! Requests are sent once; upstream failures are classified and returned to
//! the caller, which decides whether to try again.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use planwright_core::PlanError;
use planwright_security::truncate_for_log;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::sse::{self, StreamEvent};
use crate::types::{ErrorEnvelope, MessageRequest, MessageResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub type SseStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, PlanError>> + Send>>;

#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(api_key: &str, api_version: &str, timeout: Duration) -> Result<Self, PlanError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|_| PlanError::InvalidInput("API key contains invalid characters".into()))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                PlanError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PlanError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{DEFAULT_BASE_URL}/v1/messages"),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Points the client at another host (wiremock in tests, proxies in
    /// deployments).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.endpoint = format!("{}/v1/messages", base_url.trim_end_matches('/'));
        self
    }

    /// Sends a streaming request and returns the parsed event stream.
    pub async fn stream_message(&self, request: &MessageRequest) -> Result<SseStream, PlanError> {
        let mut req = request.clone();
        req.stream = true;
        let response = self.send(&req).await?;
        Ok(sse::parse_sse_stream(response))
    }

    /// Sends a non-streaming request.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, PlanError> {
        let mut req = request.clone();
        req.stream = false;
        let response = self.send(&req).await?;
        let body = response.text().await.map_err(|e| PlanError::BadGateway {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| PlanError::BadGateway {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn send(&self, request: &MessageRequest) -> Result<reqwest::Response, PlanError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlanError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    PlanError::Unreachable {
                        message: "cannot reach the Anthropic API".into(),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(%status, stream = request.stream, "messages response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body, &self.api_key))
    }
}

/// Maps a non-success status to an error kind, redacting the body.
pub(crate) fn classify_status(status: StatusCode, body: &str, api_key: &str) -> PlanError {
    let detail = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(api_err) => format!("{}: {}", api_err.error.type_, api_err.error.message),
        Err(_) => body.to_string(),
    };
    let detail = truncate_for_log(&detail, &[api_key]);

    match status.as_u16() {
        401 | 403 => PlanError::Unauthorized(format!("Anthropic API rejected the key ({detail})")),
        429 => PlanError::RateLimited(format!("Anthropic API ({detail})")),
        _ => PlanError::bad_gateway(format!("Anthropic API returned {status}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use planwright_core::ErrorKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AnthropicClient {
        AnthropicClient::new("sk-test-key", "2023-06-01", Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    fn test_request() -> MessageRequest {
        MessageRequest {
            model: "claude-sonnet-4-20250514".into(),
            system: "sys".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "Hello".into(),
            }],
            max_tokens: 1,
            temperature: 0.2,
            stream: true,
        }
    }

    #[tokio::test]
    async fn complete_message_sends_headers_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "model": "claude-sonnet-4-20250514",
                "content": [{"type": "text", "text": "ok"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap();
        assert_eq!(resp.id, "msg_1");
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"type": "rate_limit_error", "message": "Rate limited"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .stream_message(&test_request())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn invalid_key_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"type": "authentication_error", "message": "invalid x-api-key"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn overloaded_is_bad_gateway_and_redacted() {
        let body = r#"{"error":{"type":"overloaded_error","message":"key sk-test-key overloaded"}}"#;
        let err = classify_status(StatusCode::from_u16(529).unwrap(), body, "sk-test-key");
        assert_eq!(err.kind(), ErrorKind::BadGateway);
        let msg = err.to_string();
        assert!(msg.contains("overloaded_error"));
        assert!(!msg.contains("sk-test-key"));
    }

    #[test]
    fn debug_redacts_key() {
        let client = AnthropicClient::new("sk-secret", "2023-06-01", Duration::from_secs(1)).unwrap();
        assert!(!format!("{client:?}").contains("sk-secret"));
    }
}
