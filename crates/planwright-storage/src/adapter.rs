// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ticket cache, template store, and history store.

use async_trait::async_trait;

use planwright_core::{
    HistoryEntry, HistoryStore, NewHistoryRecord, NewTemplate, PlanError, Template, TemplateStore,
    Ticket, TicketCache,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed stores sharing one [`Database`] handle.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketCache for SqliteStorage {
    async fn get(&self, ticket_key: &str) -> Result<Option<Ticket>, PlanError> {
        queries::tickets::get_ticket(&self.db, ticket_key).await
    }

    async fn upsert(&self, ticket: &Ticket) -> Result<i64, PlanError> {
        queries::tickets::upsert_ticket(&self.db, ticket).await
    }

    async fn list(&self) -> Result<Vec<Ticket>, PlanError> {
        queries::tickets::list_tickets(&self.db).await
    }

    async fn delete(&self, ticket_key: &str) -> Result<(), PlanError> {
        if queries::tickets::delete_ticket(&self.db, ticket_key).await? {
            Ok(())
        } else {
            Err(PlanError::not_found("ticket", ticket_key))
        }
    }
}

#[async_trait]
impl TemplateStore for SqliteStorage {
    async fn get(&self, id: i64) -> Result<Option<Template>, PlanError> {
        queries::templates::get_template(&self.db, id).await
    }

    async fn get_default(&self) -> Result<Option<Template>, PlanError> {
        queries::templates::get_default_template(&self.db).await
    }

    async fn list(&self) -> Result<Vec<Template>, PlanError> {
        queries::templates::list_templates(&self.db).await
    }

    async fn insert(&self, template: NewTemplate) -> Result<Template, PlanError> {
        queries::templates::insert_template(&self.db, template).await
    }

    async fn rename(&self, id: i64, name: &str) -> Result<Template, PlanError> {
        queries::templates::rename_template(&self.db, id, name)
            .await?
            .ok_or_else(|| PlanError::not_found("template", id))
    }

    async fn set_default(&self, id: i64) -> Result<Template, PlanError> {
        queries::templates::set_default_template(&self.db, id)
            .await?
            .ok_or_else(|| PlanError::not_found("template", id))
    }

    async fn delete(&self, id: i64) -> Result<Template, PlanError> {
        queries::templates::delete_template(&self.db, id)
            .await?
            .ok_or_else(|| PlanError::not_found("template", id))
    }
}

#[async_trait]
impl HistoryStore for SqliteStorage {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, PlanError> {
        queries::history::insert_history(&self.db, record).await
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryEntry>, PlanError> {
        queries::history::list_history(&self.db, limit).await
    }

    async fn get(&self, id: i64) -> Result<Option<HistoryEntry>, PlanError> {
        queries::history::get_history(&self.db, id).await
    }

    async fn delete(&self, id: i64) -> Result<(), PlanError> {
        if queries::history::delete_history(&self.db, id).await? {
            Ok(())
        } else {
            Err(PlanError::not_found("history", id))
        }
    }
}
