// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket cache operations.

use chrono::{DateTime, Utc};
use planwright_core::{Attachment, PlanError, Ticket};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, ticket_key, summary, description, priority, status, assignee, \
                       labels, acceptance_criteria, attachments, fetched_at";

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let labels: String = row.get(7)?;
    let attachments: String = row.get(9)?;
    Ok(Ticket {
        id: Some(row.get(0)?),
        key: row.get(1)?,
        summary: row.get(2)?,
        description: row.get(3)?,
        priority: row.get(4)?,
        status: row.get(5)?,
        assignee: row.get(6)?,
        labels: decode_json(7, &labels)?,
        acceptance_criteria: row.get(8)?,
        attachments: decode_json::<Vec<Attachment>>(9, &attachments)?,
        fetched_at: row.get::<_, DateTime<Utc>>(10)?,
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(idx: usize, text: &str) -> rusqlite::Result<T> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> rusqlite::Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub async fn get_ticket(db: &Database, key: &str) -> Result<Option<Ticket>, PlanError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM tickets WHERE ticket_key = ?1"),
                params![key],
                row_to_ticket,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Inserts the ticket or overwrites every field of the existing row with the
/// same key, including the caller's `fetched_at`. Returns the row id, which
/// is stable across overwrites.
pub async fn upsert_ticket(db: &Database, ticket: &Ticket) -> Result<i64, PlanError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            let labels = encode_json(&ticket.labels)?;
            let attachments = encode_json(&ticket.attachments)?;
            conn.query_row(
                "INSERT INTO tickets (ticket_key, summary, description, priority, status, assignee,
                                      labels, acceptance_criteria, attachments, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(ticket_key) DO UPDATE SET
                     summary = excluded.summary,
                     description = excluded.description,
                     priority = excluded.priority,
                     status = excluded.status,
                     assignee = excluded.assignee,
                     labels = excluded.labels,
                     acceptance_criteria = excluded.acceptance_criteria,
                     attachments = excluded.attachments,
                     fetched_at = excluded.fetched_at
                 RETURNING id",
                params![
                    ticket.key,
                    ticket.summary,
                    ticket.description,
                    ticket.priority,
                    ticket.status,
                    ticket.assignee,
                    labels,
                    ticket.acceptance_criteria,
                    attachments,
                    ticket.fetched_at,
                ],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// All cached tickets, most recently fetched first.
pub async fn list_tickets(db: &Database) -> Result<Vec<Ticket>, PlanError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM tickets ORDER BY fetched_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_ticket)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Returns `true` if a row was deleted.
pub async fn delete_ticket(db: &Database, key: &str) -> Result<bool, PlanError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM tickets WHERE ticket_key = ?1", params![key])?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    fn make_ticket(key: &str, summary: &str) -> Ticket {
        Ticket {
            id: None,
            key: key.to_string(),
            summary: summary.to_string(),
            description: "As a user I want to log in".to_string(),
            priority: Some("High".to_string()),
            status: Some("To Do".to_string()),
            assignee: None,
            labels: vec!["auth".to_string()],
            acceptance_criteria: "- login works".to_string(),
            attachments: vec![Attachment {
                filename: "flow.png".to_string(),
                content_type: "image/png".to_string(),
                size: 2048,
                url: "https://acme.atlassian.net/att/1".to_string(),
            }],
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_roundtrips() {
        let (db, _dir) = setup_db().await;
        let id = upsert_ticket(&db, &make_ticket("ABC-1", "Login")).await.unwrap();

        let cached = get_ticket(&db, "ABC-1").await.unwrap().unwrap();
        assert_eq!(cached.id, Some(id));
        assert_eq!(cached.summary, "Login");
        assert_eq!(cached.labels, vec!["auth"]);
        assert_eq!(cached.attachments.len(), 1);
        assert_eq!(cached.attachments[0].size, 2048);
        assert!(cached.assignee.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn refetch_overwrites_in_place() {
        let (db, _dir) = setup_db().await;
        let first_id = upsert_ticket(&db, &make_ticket("ABC-1", "Old")).await.unwrap();
        let before = get_ticket(&db, "ABC-1").await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut updated = make_ticket("ABC-1", "New");
        updated.status = Some("Done".to_string());
        updated.labels.clear();
        let second_id = upsert_ticket(&db, &updated).await.unwrap();

        assert_eq!(first_id, second_id);
        let after = get_ticket(&db, "ABC-1").await.unwrap().unwrap();
        assert_eq!(after.summary, "New");
        assert_eq!(after.status.as_deref(), Some("Done"));
        assert!(after.labels.is_empty());
        assert!(after.fetched_at > before.fetched_at);
        assert_eq!(list_tickets(&db).await.unwrap().len(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stored_fetched_at_is_the_tickets_own() {
        let (db, _dir) = setup_db().await;
        let fetched = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let mut ticket = make_ticket("ABC-1", "Login");
        ticket.fetched_at = fetched;
        upsert_ticket(&db, &ticket).await.unwrap();

        let cached = get_ticket(&db, "ABC-1").await.unwrap().unwrap();
        assert_eq!(cached.fetched_at, fetched);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_ticket_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_ticket(&db, "NOPE-9").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let (db, _dir) = setup_db().await;
        upsert_ticket(&db, &make_ticket("ABC-1", "x")).await.unwrap();
        assert!(delete_ticket(&db, "ABC-1").await.unwrap());
        assert!(!delete_ticket(&db, "ABC-1").await.unwrap());
        db.close().await.unwrap();
    }
}
