// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the stores, ticket source, providers, and the
//! generation pipeline.

use chrono::{DateTime, Utc};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use strum::{Display, EnumString};

use crate::error::{ErrorKind, PlanError};

/// File attached to a ticket in the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub url: String,
}

/// Normalized ticket as fetched from the issue tracker and held in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Cache row id, `None` until the ticket has been upserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Tracker-assigned identifier, `PREFIX-number`.
    pub key: String,
    pub summary: String,
    pub description: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub fetched_at: DateTime<Utc>,
}

/// Normalizes a user-supplied ticket key to `PREFIX-number` form
/// (trimmed, upper-cased).
pub fn normalize_ticket_key(raw: &str) -> Result<String, PlanError> {
    let key = raw.trim().to_ascii_uppercase();
    let valid = key.rsplit_once('-').is_some_and(|(prefix, number)| {
        let mut chars = prefix.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !number.is_empty()
            && number.chars().all(|c| c.is_ascii_digit())
    });
    if valid {
        Ok(key)
    } else {
        Err(PlanError::InvalidInput(format!(
            "`{}` is not a ticket key (expected PREFIX-123)",
            raw.trim()
        )))
    }
}

/// An uploaded document template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub file_path: String,
    pub content: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Template row to insert; content is fixed at creation.
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub file_path: String,
    pub content: String,
    pub is_default: bool,
}

/// History row to append after a completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub ticket_key: String,
    pub ticket_id: Option<i64>,
    pub template_id: Option<i64>,
    pub provider: String,
    pub generated_content: String,
}

/// A persisted generation, enriched with the ticket summary for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub ticket_key: String,
    pub ticket_id: Option<i64>,
    pub template_id: Option<i64>,
    pub provider: String,
    pub generated_content: String,
    /// Ticket summary, or the ticket key when the ticket is no longer cached.
    pub ticket_summary: String,
    pub created_at: DateTime<Utc>,
}

/// Which generation backend to use.
///
/// Serializes as `"cloud"` / `"local"`; deserializes through [`FromStr`], so
/// JSON bodies accept the same aliases and casing as the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Hosted API (Anthropic).
    #[strum(to_string = "cloud", serialize = "anthropic", serialize = "claude")]
    Cloud,
    /// Same-host or LAN daemon (Ollama).
    #[strum(to_string = "local", serialize = "ollama")]
    Local,
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(|_| {
            de::Error::custom(format!("unknown provider `{raw}` (expected cloud or local)"))
        })
    }
}

/// Per-request bundle handed to a provider. Discarded after use.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub ticket: Ticket,
    pub template_content: String,
    pub temperature: f32,
}

/// One element of a generation event sequence.
///
/// Exactly one of [`GenerationEvent::Complete`] or [`GenerationEvent::Error`]
/// terminates a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    Progress {
        message: String,
        progress: u8,
    },
    Content {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<u8>,
    },
    Complete {
        data: String,
        progress: u8,
    },
    Error {
        message: String,
        kind: ErrorKind,
    },
}

impl GenerationEvent {
    pub fn progress(message: impl Into<String>, progress: u8) -> Self {
        Self::Progress {
            message: message.into(),
            progress: progress.min(100),
        }
    }

    pub fn content(data: impl Into<String>) -> Self {
        Self::Content {
            data: data.into(),
            progress: None,
        }
    }

    pub fn complete(data: impl Into<String>) -> Self {
        Self::Complete {
            data: data.into(),
            progress: 100,
        }
    }

    pub fn error(err: &PlanError) -> Self {
        Self::Error {
            message: err.to_string(),
            kind: err.kind(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Result of a lightweight reachability / credential check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}

impl ConnectionTest {
    pub fn ok(message: impl Into<String>, models: Option<Vec<String>>) -> Self {
        Self {
            success: true,
            message: message.into(),
            models,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            models: None,
        }
    }
}
