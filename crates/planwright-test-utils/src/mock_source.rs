// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory ticket source.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use planwright_core::{
    Attachment, ConnectionTest, PlanError, Ticket, TicketSource, TrackerCredentials,
};

/// A plausible ticket for `key`.
pub fn sample_ticket(key: &str) -> Ticket {
    Ticket {
        id: None,
        key: key.to_string(),
        summary: format!("{key}: password reset email"),
        description: "Users request a reset link.\n\n## Acceptance Criteria\n- link expires after 1h"
            .into(),
        priority: Some("High".into()),
        status: Some("To Do".into()),
        assignee: Some("Dana Lee".into()),
        labels: vec!["auth".into()],
        acceptance_criteria: "- link expires after 1h".into(),
        attachments: vec![Attachment {
            filename: "flow.png".into(),
            content_type: "image/png".into(),
            size: 1024,
            url: format!("https://example.atlassian.net/attachments/{key}/flow.png"),
        }],
        fetched_at: Utc::now(),
    }
}

type ErrorFactory = Box<dyn Fn(&str) -> PlanError + Send + Sync>;

/// Serves tickets from a map and counts fetches. Unknown keys are
/// `NotFound` unless a failure is configured.
#[derive(Default)]
pub struct MockTicketSource {
    tickets: Mutex<HashMap<String, Ticket>>,
    failure: Option<ErrorFactory>,
    fetches: AtomicUsize,
}

impl MockTicketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticket(self, ticket: Ticket) -> Self {
        self.insert(ticket);
        self
    }

    /// Every fetch fails with the error built by `f`.
    pub fn failing(f: impl Fn(&str) -> PlanError + Send + Sync + 'static) -> Self {
        Self {
            failure: Some(Box::new(f)),
            ..Self::default()
        }
    }

    /// Adds or replaces a ticket (e.g. to simulate an upstream edit).
    pub fn insert(&self, ticket: Ticket) {
        if let Ok(mut map) = self.tickets.lock() {
            map.insert(ticket.key.clone(), ticket);
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketSource for MockTicketSource {
    async fn fetch(
        &self,
        _credentials: &TrackerCredentials,
        ticket_key: &str,
    ) -> Result<Ticket, PlanError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(f) = &self.failure {
            return Err(f(ticket_key));
        }
        let ticket = self
            .tickets
            .lock()
            .map_err(|_| PlanError::Internal("mock ticket source poisoned".into()))?
            .get(ticket_key)
            .cloned();
        let mut ticket = ticket.ok_or_else(|| PlanError::not_found("ticket", ticket_key))?;
        ticket.fetched_at = Utc::now();
        Ok(ticket)
    }

    async fn test_connection(&self, credentials: &TrackerCredentials) -> ConnectionTest {
        ConnectionTest::ok(format!("Connected to Jira as {}", credentials.email), None)
    }
}
