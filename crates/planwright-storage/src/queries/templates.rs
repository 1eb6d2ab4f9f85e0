// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template operations. At most one row has `is_default = 1`; every write
//! that sets the flag clears the others in the same transaction.

use chrono::Utc;
use planwright_core::{NewTemplate, PlanError, Template};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, name, file_path, content, is_default, created_at";

fn row_to_template(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        file_path: row.get(2)?,
        content: row.get(3)?,
        is_default: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub async fn get_template(db: &Database, id: i64) -> Result<Option<Template>, PlanError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM templates WHERE id = ?1"),
                params![id],
                row_to_template,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_default_template(db: &Database) -> Result<Option<Template>, PlanError> {
    db.connection()
        .call(|conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM templates WHERE is_default = 1"),
                [],
                row_to_template,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// All templates, default first, then newest first.
pub async fn list_templates(db: &Database) -> Result<Vec<Template>, PlanError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM templates ORDER BY is_default DESC, created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_template)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn insert_template(db: &Database, template: NewTemplate) -> Result<Template, PlanError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            if template.is_default {
                tx.execute("UPDATE templates SET is_default = 0 WHERE is_default = 1", [])?;
            }
            let inserted = tx.query_row(
                &format!(
                    "INSERT INTO templates (name, file_path, content, is_default, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING {COLUMNS}"
                ),
                params![
                    template.name,
                    template.file_path,
                    template.content,
                    template.is_default,
                    Utc::now(),
                ],
                row_to_template,
            )?;
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn rename_template(
    db: &Database,
    id: i64,
    name: &str,
) -> Result<Option<Template>, PlanError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("UPDATE templates SET name = ?1 WHERE id = ?2 RETURNING {COLUMNS}"),
                params![name, id],
                row_to_template,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Makes `id` the only default. Returns `None` (with nothing changed) when
/// the id does not exist.
pub async fn set_default_template(db: &Database, id: i64) -> Result<Option<Template>, PlanError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row("SELECT 1 FROM templates WHERE id = ?1", params![id], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                // Dropping the transaction rolls it back.
                return Ok(None);
            }
            tx.execute(
                "UPDATE templates SET is_default = 0 WHERE is_default = 1 AND id != ?1",
                params![id],
            )?;
            let updated = tx.query_row(
                &format!("UPDATE templates SET is_default = 1 WHERE id = ?1 RETURNING {COLUMNS}"),
                params![id],
                row_to_template,
            )?;
            tx.commit()?;
            Ok(Some(updated))
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes the row and returns it, or `None` if it did not exist.
pub async fn delete_template(db: &Database, id: i64) -> Result<Option<Template>, PlanError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("DELETE FROM templates WHERE id = ?1 RETURNING {COLUMNS}"),
                params![id],
                row_to_template,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    fn new_template(name: &str, is_default: bool) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            file_path: format!("/tmp/{name}.md"),
            content: format!("# {name}"),
            is_default,
        }
    }

    async fn default_count(db: &Database) -> usize {
        list_templates(db)
            .await
            .unwrap()
            .iter()
            .filter(|t| t.is_default)
            .count()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let (db, _dir) = setup_db().await;
        let t = insert_template(&db, new_template("basic", false)).await.unwrap();
        let fetched = get_template(&db, t.id).await.unwrap().unwrap();
        assert_eq!(fetched, t);
        assert!(get_default_template(&db).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_default_clears_previous() {
        let (db, _dir) = setup_db().await;
        let a = insert_template(&db, new_template("a", true)).await.unwrap();
        let b = insert_template(&db, new_template("b", false)).await.unwrap();
        assert_eq!(get_default_template(&db).await.unwrap().unwrap().id, a.id);

        let updated = set_default_template(&db, b.id).await.unwrap().unwrap();
        assert!(updated.is_default);
        assert_eq!(default_count(&db).await, 1);
        assert_eq!(get_default_template(&db).await.unwrap().unwrap().id, b.id);
        assert!(!get_template(&db, a.id).await.unwrap().unwrap().is_default);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn inserting_a_default_demotes_the_old_one() {
        let (db, _dir) = setup_db().await;
        insert_template(&db, new_template("a", true)).await.unwrap();
        let b = insert_template(&db, new_template("b", true)).await.unwrap();
        assert_eq!(default_count(&db).await, 1);
        assert_eq!(get_default_template(&db).await.unwrap().unwrap().id, b.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_default_on_missing_id_changes_nothing() {
        let (db, _dir) = setup_db().await;
        let a = insert_template(&db, new_template("a", true)).await.unwrap();
        assert!(set_default_template(&db, 999).await.unwrap().is_none());
        assert_eq!(get_default_template(&db).await.unwrap().unwrap().id, a.id);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn setting_current_default_again_is_a_no_op() {
        let (db, _dir) = setup_db().await;
        let a = insert_template(&db, new_template("a", true)).await.unwrap();
        assert!(set_default_template(&db, a.id).await.unwrap().unwrap().is_default);
        assert_eq!(default_count(&db).await, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn rename_keeps_content() {
        let (db, _dir) = setup_db().await;
        let t = insert_template(&db, new_template("old", false)).await.unwrap();
        let renamed = rename_template(&db, t.id, "new").await.unwrap().unwrap();
        assert_eq!(renamed.name, "new");
        assert_eq!(renamed.content, t.content);
        assert!(rename_template(&db, 404, "x").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_returns_row_once() {
        let (db, _dir) = setup_db().await;
        let t = insert_template(&db, new_template("gone", false)).await.unwrap();
        assert_eq!(delete_template(&db, t.id).await.unwrap().unwrap().id, t.id);
        assert!(delete_template(&db, t.id).await.unwrap().is_none());
        assert!(list_templates(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
