// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use planwright_core::{CredentialStore, HistoryStore, TicketCache};
use planwright_generator::Generator;
use planwright_templates::TemplateLibrary;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Generator,
    pub templates: TemplateLibrary,
    pub tickets: Arc<dyn TicketCache>,
    pub history: Arc<dyn HistoryStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub limits: HistoryLimits,
    /// Deadline for `POST /api/generate-sync`.
    pub sync_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct HistoryLimits {
    pub default: u32,
    pub max: u32,
}

impl HistoryLimits {
    /// Requested limit, defaulted and clamped to `1..=max`.
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default).clamp(1, self.max.max(1))
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            default: 20,
            max: 100,
        }
    }
}
