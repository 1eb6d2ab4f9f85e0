// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Security helpers for Planwright.
//!
//! Credentials must never reach an error message or a log line. Anything that
//! echoes text received from an upstream service runs it through
//! [`redact::redact`] first.

pub mod redact;

pub use redact::{REDACTED, redact, truncate_for_log};
