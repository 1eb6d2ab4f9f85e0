// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation history operations. Rows are appended and deleted, never updated.

use chrono::Utc;
use planwright_core::{HistoryEntry, NewHistoryRecord, PlanError};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

/// The summary falls back to the ticket key when the ticket is no longer cached.
const SELECT: &str = "SELECT h.id, h.ticket_key, h.ticket_id, h.template_id, h.provider,
                             h.generated_content, COALESCE(t.summary, h.ticket_key), h.created_at
                      FROM generation_history h
                      LEFT JOIN tickets t ON t.ticket_key = h.ticket_key";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        ticket_key: row.get(1)?,
        ticket_id: row.get(2)?,
        template_id: row.get(3)?,
        provider: row.get(4)?,
        generated_content: row.get(5)?,
        ticket_summary: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub async fn insert_history(db: &Database, record: NewHistoryRecord) -> Result<i64, PlanError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO generation_history
                     (ticket_key, ticket_id, template_id, provider, generated_content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.ticket_key,
                    record.ticket_id,
                    record.template_id,
                    record.provider,
                    record.generated_content,
                    Utc::now(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent `limit` entries, newest first.
pub async fn list_history(db: &Database, limit: u32) -> Result<Vec<HistoryEntry>, PlanError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT} ORDER BY h.created_at DESC, h.id DESC LIMIT ?1"))?;
            let rows = stmt.query_map(params![limit], row_to_entry)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_history(db: &Database, id: i64) -> Result<Option<HistoryEntry>, PlanError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(&format!("{SELECT} WHERE h.id = ?1"), params![id], row_to_entry)
                .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Returns `true` if a row was deleted.
pub async fn delete_history(db: &Database, id: i64) -> Result<bool, PlanError> {
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM generation_history WHERE id = ?1", params![id])?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}
