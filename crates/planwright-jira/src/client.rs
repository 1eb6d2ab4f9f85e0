// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Jira Cloud REST API.
//!
//! Credentials are passed per call because they can change at runtime
//! through the settings API.

use std::time::Duration;

use planwright_core::{PlanError, TrackerCredentials};
use planwright_security::truncate_for_log;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ErrorBody, IssueResponse, MyselfResponse};

const BASE_FIELDS: &str = "summary,description,priority,status,assignee,labels,attachment";

#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl JiraClient {
    pub fn new(timeout: Duration) -> Result<Self, PlanError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlanError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// `GET /rest/api/3/issue/{key}` with the standard fields plus `extra_field`.
    pub async fn get_issue(
        &self,
        creds: &TrackerCredentials,
        key: &str,
        extra_field: Option<&str>,
    ) -> Result<IssueResponse, PlanError> {
        let fields = match extra_field {
            Some(f) => format!("{BASE_FIELDS},{f}"),
            None => BASE_FIELDS.to_string(),
        };
        let url = format!("{}/rest/api/3/issue/{key}", creds.base_url);
        self.get_json(creds, &url, &[("fields", fields.as_str())], Some(key))
            .await
    }

    /// `GET /rest/api/3/myself`, used to validate credentials.
    pub async fn myself(&self, creds: &TrackerCredentials) -> Result<MyselfResponse, PlanError> {
        let url = format!("{}/rest/api/3/myself", creds.base_url);
        self.get_json(creds, &url, &[], None).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        creds: &TrackerCredentials,
        url: &str,
        query: &[(&str, &str)],
        ticket_key: Option<&str>,
    ) -> Result<T, PlanError> {
        let parsed = if query.is_empty() {
            reqwest::Url::parse(url)
        } else {
            reqwest::Url::parse_with_params(url, query)
        };
        let url = parsed.map_err(|e| {
            PlanError::InvalidInput(format!("invalid Jira base URL `{}`: {e}", creds.base_url))
        })?;
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&creds.email, Some(&creds.api_token))
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&creds.base_url, e))?;

        let status = response.status();
        debug!(%status, url = %url.path(), "jira response received");

        if status.is_success() {
            let body = response.text().await.map_err(|e| PlanError::BadGateway {
                message: format!("failed to read Jira response: {e}"),
                source: Some(Box::new(e)),
            })?;
            return serde_json::from_str(&body).map_err(|e| PlanError::BadGateway {
                message: format!("unexpected Jira response: {e}"),
                source: Some(Box::new(e)),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body, creds, ticket_key))
    }

    fn transport_error(&self, base_url: &str, e: reqwest::Error) -> PlanError {
        if e.is_timeout() {
            return PlanError::Timeout {
                duration: self.timeout,
            };
        }
        PlanError::Unreachable {
            message: format!("cannot reach Jira at {base_url}"),
            source: Some(Box::new(e)),
        }
    }
}

/// Maps a non-success Jira status onto the error taxonomy. The body is
/// redacted before it is included in a message.
pub(crate) fn classify_status(
    status: StatusCode,
    body: &str,
    creds: &TrackerCredentials,
    ticket_key: Option<&str>,
) -> PlanError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.summary())
        .unwrap_or_else(|| body.to_string());
    let detail = truncate_for_log(&detail, &[&creds.api_token, &creds.email]);

    match status.as_u16() {
        404 => match ticket_key {
            Some(key) => PlanError::not_found("ticket", key),
            None => PlanError::bad_gateway(format!("Jira returned 404: {detail}")),
        },
        401 | 403 => PlanError::Unauthorized(format!(
            "Jira rejected the configured credentials ({status})"
        )),
        429 => PlanError::RateLimited("Jira rate limit exceeded".to_string()),
        s if s >= 500 => PlanError::bad_gateway(format!("Jira returned {status}: {detail}")),
        _ => PlanError::bad_gateway(format!("Jira returned {status}: {detail}")),
    }
}
