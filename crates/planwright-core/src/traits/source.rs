// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::PlanError;
use crate::settings::TrackerCredentials;
use crate::types::{ConnectionTest, Ticket};

/// Fetches tickets from the external issue tracker and normalizes them.
#[async_trait]
pub trait TicketSource: Send + Sync + 'static {
    /// Fetches one ticket. Fails with `NotFound` when the tracker has no such
    /// ticket and with `Unreachable` on transport failure.
    async fn fetch(
        &self,
        credentials: &TrackerCredentials,
        ticket_key: &str,
    ) -> Result<Ticket, PlanError>;

    /// Checks that the credentials are accepted by the tracker.
    async fn test_connection(&self, credentials: &TrackerCredentials) -> ConnectionTest;
}
