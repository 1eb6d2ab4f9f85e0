// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jira Cloud ticket source.
//!
//! Fetches issues over REST API v3 with basic auth, flattens ADF
//! descriptions to text, and derives acceptance criteria either from a
//! configured custom field or from the description itself.

pub mod adf;
pub mod client;
pub mod criteria;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use planwright_config::model::JiraConfig;
use planwright_core::{
    Attachment, ConnectionTest, PlanError, Ticket, TicketSource, TrackerCredentials,
};
use tracing::{debug, info, warn};

pub use client::JiraClient;

use crate::types::IssueResponse;

/// [`TicketSource`] backed by the Jira Cloud REST API.
#[derive(Debug, Clone)]
pub struct JiraTicketSource {
    client: JiraClient,
    acceptance_criteria_field: Option<String>,
}

impl JiraTicketSource {
    pub fn new(config: &JiraConfig) -> Result<Self, PlanError> {
        let client = JiraClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            acceptance_criteria_field: config
                .acceptance_criteria_field
                .clone()
                .filter(|f| !f.trim().is_empty()),
        })
    }

    fn normalize(&self, issue: IssueResponse) -> Ticket {
        let fields = issue.fields;
        let description = adf::flatten(&fields.description);

        let from_field = self
            .acceptance_criteria_field
            .as_deref()
            .and_then(|f| fields.extra.get(f))
            .map(adf::flatten)
            .filter(|s| !s.trim().is_empty());
        let acceptance_criteria =
            from_field.unwrap_or_else(|| criteria::from_description(&description));

        let attachments = fields
            .attachments
            .into_iter()
            .map(|a| Attachment {
                filename: a.filename,
                content_type: a.mime_type,
                size: a.size,
                url: a.content,
            })
            .collect();

        Ticket {
            id: None,
            key: issue.key,
            summary: fields.summary,
            description,
            priority: fields.priority.map(|p| p.name),
            status: fields.status.map(|s| s.name),
            assignee: fields.assignee.map(|a| a.display_name),
            labels: fields.labels,
            acceptance_criteria,
            attachments,
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TicketSource for JiraTicketSource {
    async fn fetch(
        &self,
        credentials: &TrackerCredentials,
        ticket_key: &str,
    ) -> Result<Ticket, PlanError> {
        debug!(ticket = ticket_key, "fetching ticket from Jira");
        let issue = self
            .client
            .get_issue(
                credentials,
                ticket_key,
                self.acceptance_criteria_field.as_deref(),
            )
            .await?;
        let ticket = self.normalize(issue);
        info!(ticket = %ticket.key, attachments = ticket.attachments.len(), "ticket fetched");
        Ok(ticket)
    }

    async fn test_connection(&self, credentials: &TrackerCredentials) -> ConnectionTest {
        match self.client.myself(credentials).await {
            Ok(me) => {
                let who = me.email_address.unwrap_or(me.display_name);
                ConnectionTest::ok(format!("Connected to Jira as {who}"), None)
            }
            Err(e) => {
                warn!(error = %e, "jira connection test failed");
                ConnectionTest::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planwright_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn creds(server: &MockServer) -> TrackerCredentials {
        TrackerCredentials {
            base_url: server.uri(),
            email: "qa@acme.io".into(),
            api_token: "secret-token".into(),
        }
    }

    fn source(field: Option<&str>) -> JiraTicketSource {
        JiraTicketSource::new(&JiraConfig {
            acceptance_criteria_field: field.map(str::to_string),
            ..JiraConfig::default()
        })
        .unwrap()
    }

    fn issue_body() -> serde_json::Value {
        json!({
            "key": "QA-42",
            "fields": {
                "summary": "Login fails on Safari",
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "Users cannot log in."}]},
                        {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Acceptance Criteria"}]},
                        {"type": "bulletList", "content": [
                            {"type": "listItem", "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Login works"}]}]}
                        ]}
                    ]
                },
                "priority": {"name": "High"},
                "status": {"name": "In Progress"},
                "assignee": {"displayName": "Dana Lee"},
                "labels": ["web", "auth"],
                "attachment": [{
                    "filename": "trace.har",
                    "mimeType": "application/json",
                    "size": 2048,
                    "content": "https://acme.atlassian.net/secure/attachment/1/trace.har"
                }],
                "customfield_10020": "Given a user, when they log in, then it works"
            }
        })
    }

    #[tokio::test]
    async fn fetch_normalizes_issue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/QA-42"))
            .and(basic_auth("qa@acme.io", "secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_body()))
            .expect(1)
            .mount(&server)
            .await;

        let ticket = source(None).fetch(&creds(&server), "QA-42").await.unwrap();
        assert_eq!(ticket.key, "QA-42");
        assert_eq!(ticket.summary, "Login fails on Safari");
        assert_eq!(ticket.priority.as_deref(), Some("High"));
        assert_eq!(ticket.status.as_deref(), Some("In Progress"));
        assert_eq!(ticket.assignee.as_deref(), Some("Dana Lee"));
        assert_eq!(ticket.labels, vec!["web", "auth"]);
        assert!(ticket.description.starts_with("Users cannot log in."));
        assert_eq!(ticket.acceptance_criteria, "- Login works");
        assert_eq!(ticket.attachments.len(), 1);
        assert_eq!(ticket.attachments[0].content_type, "application/json");
        assert_eq!(ticket.attachments[0].size, 2048);
        assert!(ticket.id.is_none());
    }

    #[tokio::test]
    async fn custom_field_takes_precedence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/QA-42"))
            .and(query_param(
                "fields",
                "summary,description,priority,status,assignee,labels,attachment,customfield_10020",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_body()))
            .mount(&server)
            .await;

        let ticket = source(Some("customfield_10020"))
            .fetch(&creds(&server), "QA-42")
            .await
            .unwrap();
        assert_eq!(
            ticket.acceptance_criteria,
            "Given a user, when they log in, then it works"
        );
    }

    #[tokio::test]
    async fn missing_issue_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/QA-404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errorMessages": ["Issue does not exist or you do not have permission to see it."],
                "errors": {}
            })))
            .mount(&server)
            .await;

        let err = source(None)
            .fetch(&creds(&server), "QA-404")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("QA-404"));
    }

    #[tokio::test]
    async fn rejected_credentials_are_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/QA-1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = source(None)
            .fetch(&creds(&server), "QA-1")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn unreachable_host() {
        let creds = TrackerCredentials {
            base_url: "http://127.0.0.1:1".into(),
            email: "qa@acme.io".into(),
            api_token: "t".into(),
        };
        let err = source(None).fetch(&creds, "QA-1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unreachable);
    }

    #[tokio::test]
    async fn connection_test_reports_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "displayName": "QA Bot",
                "emailAddress": "qa@acme.io"
            })))
            .mount(&server)
            .await;

        let result = source(None).test_connection(&creds(&server)).await;
        assert!(result.success);
        assert!(result.message.contains("qa@acme.io"));
    }

    #[tokio::test]
    async fn connection_test_failure_is_reported_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/myself"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let result = source(None).test_connection(&creds(&server)).await;
        assert!(!result.success);
    }
}
