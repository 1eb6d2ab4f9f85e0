// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for Planwright.
//!
//! Exposes streaming (SSE) and synchronous generation, plus history,
//! ticket cache, template, settings, and connection-check endpoints under
//! `/api`. Errors are returned as `{"error": {"kind", "message"}}` with a
//! status derived from the error kind.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult, status_for};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use server::{MAX_UPLOAD_BYTES, router, serve};
pub use state::{AppState, HistoryLimits};
