// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Planwright.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Planwright collaborators and the
/// generation pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Required runtime configuration is absent (e.g. tracker credentials not set).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A ticket, template, or history id does not resolve.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A downstream service could not be reached.
    #[error("service unreachable: {message}")]
    Unreachable {
        message: String,
        source: Option<BoxError>,
    },

    /// A downstream service answered with a server error or a malformed payload.
    #[error("bad gateway: {message}")]
    BadGateway {
        message: String,
        source: Option<BoxError>,
    },

    /// Invalid credentials were presented to the tracker or a provider.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Upstream throttling.
    #[error("too many requests: {0}")]
    RateLimited(String),

    /// Malformed request data (bad ticket id, unsupported upload type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Credential encryption or decryption failure.
    #[error("vault error: {0}")]
    Vault(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// An error that was already classified and rendered upstream, e.g. one
    /// carried by a generation `error` event.
    #[error("{message}")]
    Reported { kind: ErrorKind, message: String },
}

/// Stable, machine-readable error classification exposed to callers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Precondition,
    NotFound,
    Unreachable,
    BadGateway,
    Unauthorized,
    RateLimited,
    InvalidInput,
    Internal,
}

impl PlanError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::BadGateway {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any storage-layer error.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }

    /// Classifies this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unreachable { .. } | Self::Timeout { .. } => ErrorKind::Unreachable,
            Self::BadGateway { .. } => ErrorKind::BadGateway,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) | Self::Storage { .. } | Self::Vault(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
            Self::Reported { kind, .. } => *kind,
        }
    }
}
