// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Planwright.
//!
//! WAL-mode SQLite with embedded refinery migrations. All access goes through
//! a single `tokio-rusqlite` background thread, so each statement is atomic
//! and no generation holds a transaction open.

pub mod adapter;
pub mod credentials;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use credentials::{SettingsDefaults, SqliteCredentialStore};
pub use database::Database;
