// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw key/value settings rows. Encryption happens in
//! [`SqliteCredentialStore`](crate::SqliteCredentialStore).

use std::collections::HashMap;

use chrono::Utc;
use planwright_core::PlanError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// A stored value and whether it is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSetting {
    pub value: String,
    pub encrypted: bool,
}

/// One pending change: `Some` writes, `None` removes the key.
#[derive(Debug, Clone)]
pub struct SettingChange {
    pub key: &'static str,
    pub value: Option<StoredSetting>,
}

pub async fn load_settings(db: &Database) -> Result<HashMap<String, StoredSetting>, PlanError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT key, value, encrypted FROM settings")?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    StoredSetting {
                        value: row.get(1)?,
                        encrypted: row.get(2)?,
                    },
                ))
            })?;
            rows.collect::<Result<HashMap<_, _>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Applies all changes in one transaction.
pub async fn apply_changes(db: &Database, changes: Vec<SettingChange>) -> Result<(), PlanError> {
    if changes.is_empty() {
        return Ok(());
    }
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let now = Utc::now();
            for change in &changes {
                match &change.value {
                    Some(stored) => {
                        tx.execute(
                            "INSERT INTO settings (key, value, encrypted, updated_at)
                             VALUES (?1, ?2, ?3, ?4)
                             ON CONFLICT(key) DO UPDATE SET
                                 value = excluded.value,
                                 encrypted = excluded.encrypted,
                                 updated_at = excluded.updated_at",
                            params![change.key, stored.value, stored.encrypted, now],
                        )?;
                    }
                    None => {
                        tx.execute("DELETE FROM settings WHERE key = ?1", params![change.key])?;
                    }
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn write_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("s.db").to_str().unwrap())
            .await
            .unwrap();

        let plain = |v: &str| {
            Some(StoredSetting {
                value: v.to_string(),
                encrypted: false,
            })
        };
        apply_changes(
            &db,
            vec![
                SettingChange { key: "ollama_model", value: plain("llama3.1") },
                SettingChange { key: "jira_email", value: plain("qa@acme.io") },
            ],
        )
        .await
        .unwrap();
        apply_changes(
            &db,
            vec![
                SettingChange { key: "ollama_model", value: plain("mistral") },
                SettingChange { key: "jira_email", value: None },
            ],
        )
        .await
        .unwrap();

        let settings = load_settings(&db).await.unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings["ollama_model"].value, "mistral");
        db.close().await.unwrap();
    }
}
