// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::PlanError;
use crate::settings::{ProviderSettings, SettingsUpdate, SettingsView, TrackerCredentials};
use crate::types::ProviderKind;

/// Persists provider credentials and preferences with field-level encryption.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Effective configuration for one provider (persisted values over defaults).
    async fn get_provider_config(&self, kind: ProviderKind) -> Result<ProviderSettings, PlanError>;

    /// Tracker credentials, or `None` when any part is missing.
    async fn get_tracker_credentials(&self) -> Result<Option<TrackerCredentials>, PlanError>;

    /// Default provider when a caller does not choose one.
    async fn default_provider(&self) -> Result<ProviderKind, PlanError>;

    async fn save_settings(&self, update: SettingsUpdate) -> Result<(), PlanError>;

    /// Effective settings with secrets masked.
    async fn settings_view(&self) -> Result<SettingsView, PlanError>;
}
