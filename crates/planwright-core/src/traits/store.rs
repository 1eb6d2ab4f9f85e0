// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for the ticket cache, template store, and history log.

use async_trait::async_trait;

use crate::error::PlanError;
use crate::types::{HistoryEntry, NewHistoryRecord, NewTemplate, Template, Ticket};

/// Cache of previously fetched tickets, keyed by ticket key.
#[async_trait]
pub trait TicketCache: Send + Sync + 'static {
    async fn get(&self, ticket_key: &str) -> Result<Option<Ticket>, PlanError>;

    /// Inserts or fully overwrites the ticket and refreshes its fetch time.
    /// Returns the cache row id.
    async fn upsert(&self, ticket: &Ticket) -> Result<i64, PlanError>;

    /// All cached tickets, most recently fetched first.
    async fn list(&self) -> Result<Vec<Ticket>, PlanError>;

    async fn delete(&self, ticket_key: &str) -> Result<(), PlanError>;
}

/// CRUD over uploaded templates. At most one template is the default.
#[async_trait]
pub trait TemplateStore: Send + Sync + 'static {
    async fn get(&self, id: i64) -> Result<Option<Template>, PlanError>;

    async fn get_default(&self) -> Result<Option<Template>, PlanError>;

    async fn list(&self) -> Result<Vec<Template>, PlanError>;

    async fn insert(&self, template: NewTemplate) -> Result<Template, PlanError>;

    async fn rename(&self, id: i64, name: &str) -> Result<Template, PlanError>;

    /// Marks one template as default, atomically clearing every other flag.
    async fn set_default(&self, id: i64) -> Result<Template, PlanError>;

    /// Removes the row and returns it so the caller can remove the backing file.
    async fn delete(&self, id: i64) -> Result<Template, PlanError>;
}

/// Append-only log of generated test plans.
#[async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    /// Appends one record and returns its id.
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, PlanError>;

    /// Most recent `limit` entries, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, PlanError>;

    async fn get(&self, id: i64) -> Result<Option<HistoryEntry>, PlanError>;

    async fn delete(&self, id: i64) -> Result<(), PlanError>;
}
