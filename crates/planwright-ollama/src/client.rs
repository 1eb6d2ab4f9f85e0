// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama daemon.

use std::time::Duration;

use planwright_core::PlanError;
use planwright_security::truncate_for_log;
use reqwest::StatusCode;
use tracing::debug;

use crate::types::{ChatRequest, ErrorResponse, TagsResponse};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlanError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlanError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/chat`. Returns the response once headers are in; the
    /// caller reads the NDJSON body.
    pub async fn chat(&self, request: &ChatRequest) -> Result<reqwest::Response, PlanError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(%status, model = %request.model, "ollama chat response received");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body, &request.model))
    }

    /// `GET /api/tags`: locally installed models.
    pub async fn list_models(&self) -> Result<Vec<String>, PlanError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlanError::bad_gateway(format!(
                "Ollama returned {status}: {}",
                truncate_for_log(&body, &[])
            )));
        }
        let tags: TagsResponse = response.json().await.map_err(|e| PlanError::BadGateway {
            message: format!("unexpected /api/tags response: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Connection-level failure: refused, DNS, reset, or deadline.
    pub fn transport_error(&self, e: reqwest::Error) -> PlanError {
        if e.is_timeout() {
            return PlanError::Timeout {
                duration: self.timeout,
            };
        }
        PlanError::Unreachable {
            message: format!("cannot reach Ollama at {}; is it running?", self.base_url),
            source: Some(Box::new(e)),
        }
    }
}

fn classify_status(status: StatusCode, body: &str, model: &str) -> PlanError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string());
    let detail = truncate_for_log(&detail, &[]);
    match status.as_u16() {
        404 => PlanError::not_found("model", model),
        _ => PlanError::bad_gateway(format!("Ollama returned {status}: {detail}")),
    }
}
