// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings and credential store.
//!
//! Persisted values override the defaults taken from configuration. Secret
//! keys are encrypted with the vault master key before they reach SQLite and
//! are only ever returned masked by [`CredentialStore::settings_view`].

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use planwright_config::PlanwrightConfig;
use planwright_core::{
    CredentialStore, PlanError, ProviderKind, ProviderSettings, SettingsUpdate, SettingsView,
    TrackerCredentials,
};
use planwright_vault::{FieldCipher, mask_secret};
use tracing::{debug, warn};

use crate::database::Database;
use crate::queries::settings::{self as q, SettingChange, StoredSetting};

const JIRA_BASE_URL: &str = "jira_base_url";
const JIRA_EMAIL: &str = "jira_email";
const JIRA_API_TOKEN: &str = "jira_api_token";
const ANTHROPIC_API_KEY: &str = "anthropic_api_key";
const ANTHROPIC_MODEL: &str = "anthropic_model";
const ANTHROPIC_TEMPERATURE: &str = "anthropic_temperature";
const OLLAMA_BASE_URL: &str = "ollama_base_url";
const OLLAMA_MODEL: &str = "ollama_model";
const DEFAULT_PROVIDER: &str = "default_provider";

const SECRET_KEYS: &[&str] = &[JIRA_API_TOKEN, ANTHROPIC_API_KEY];

/// Values used when nothing has been saved through the settings API.
#[derive(Clone, Default)]
pub struct SettingsDefaults {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_temperature: f32,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_temperature: f32,
    pub default_provider: Option<ProviderKind>,
}

impl std::fmt::Debug for SettingsDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsDefaults")
            .field("jira_base_url", &self.jira_base_url)
            .field("jira_email", &self.jira_email)
            .field("jira_api_token", &self.jira_api_token.as_ref().map(|_| "[redacted]"))
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("anthropic_model", &self.anthropic_model)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("ollama_model", &self.ollama_model)
            .finish_non_exhaustive()
    }
}

impl From<&PlanwrightConfig> for SettingsDefaults {
    fn from(config: &PlanwrightConfig) -> Self {
        Self {
            jira_base_url: config.jira.base_url.clone(),
            jira_email: config.jira.email.clone(),
            jira_api_token: config.jira.api_token.clone(),
            anthropic_api_key: config.anthropic.api_key.clone(),
            anthropic_model: config.anthropic.default_model.clone(),
            anthropic_temperature: config.anthropic.temperature,
            ollama_base_url: config.ollama.base_url.clone(),
            ollama_model: config.ollama.default_model.clone(),
            ollama_temperature: config.ollama.temperature,
            default_provider: ProviderKind::from_str(&config.generation.default_provider).ok(),
        }
    }
}

/// SQLite-backed [`CredentialStore`] with field-level encryption.
pub struct SqliteCredentialStore {
    db: Database,
    cipher: FieldCipher,
    defaults: SettingsDefaults,
}

impl std::fmt::Debug for SqliteCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCredentialStore")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Decrypted, merged view over persisted settings and defaults.
struct Effective {
    values: HashMap<String, String>,
}

impl Effective {
    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl SqliteCredentialStore {
    pub fn new(db: Database, cipher: FieldCipher, defaults: SettingsDefaults) -> Self {
        Self {
            db,
            cipher,
            defaults,
        }
    }

    async fn effective(&self) -> Result<Effective, PlanError> {
        let stored = q::load_settings(&self.db).await?;
        let mut values = HashMap::with_capacity(stored.len());
        for (key, setting) in stored {
            let value = if setting.encrypted {
                match self.cipher.decrypt(&setting.value) {
                    Ok(v) => v,
                    Err(e) => {
                        // Sealed under a different master key; treat as unset.
                        warn!(setting = %key, error = %e, "could not decrypt stored setting");
                        continue;
                    }
                }
            } else {
                setting.value
            };
            values.insert(key, value);
        }
        Ok(Effective { values })
    }

    fn jira_value<'a>(&'a self, eff: &'a Effective, key: &str) -> Option<&'a str> {
        let default = match key {
            JIRA_BASE_URL => self.defaults.jira_base_url.as_deref(),
            JIRA_EMAIL => self.defaults.jira_email.as_deref(),
            JIRA_API_TOKEN => self.defaults.jira_api_token.as_deref(),
            _ => None,
        };
        eff.get(key).or(default.filter(|v| !v.trim().is_empty()))
    }

    fn encode(&self, key: &'static str, value: &str) -> Result<SettingChange, PlanError> {
        if value.trim().is_empty() {
            return Ok(SettingChange { key, value: None });
        }
        let stored = if SECRET_KEYS.contains(&key) {
            StoredSetting {
                value: self.cipher.encrypt(value.trim())?,
                encrypted: true,
            }
        } else {
            StoredSetting {
                value: value.trim().to_string(),
                encrypted: false,
            }
        };
        Ok(SettingChange {
            key,
            value: Some(stored),
        })
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get_provider_config(&self, kind: ProviderKind) -> Result<ProviderSettings, PlanError> {
        let eff = self.effective().await?;
        let settings = match kind {
            ProviderKind::Cloud => ProviderSettings {
                kind,
                api_key: eff
                    .get(ANTHROPIC_API_KEY)
                    .map(str::to_string)
                    .or_else(|| self.defaults.anthropic_api_key.clone()),
                base_url: None,
                model: eff
                    .get(ANTHROPIC_MODEL)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.defaults.anthropic_model.clone()),
                temperature: eff
                    .get(ANTHROPIC_TEMPERATURE)
                    .and_then(|v| v.parse::<f32>().ok())
                    .unwrap_or(self.defaults.anthropic_temperature),
            },
            ProviderKind::Local => ProviderSettings {
                kind,
                api_key: None,
                base_url: Some(
                    eff.get(OLLAMA_BASE_URL)
                        .map(str::to_string)
                        .unwrap_or_else(|| self.defaults.ollama_base_url.clone()),
                ),
                model: eff
                    .get(OLLAMA_MODEL)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.defaults.ollama_model.clone()),
                temperature: self.defaults.ollama_temperature,
            },
        };
        Ok(settings)
    }

    async fn get_tracker_credentials(&self) -> Result<Option<TrackerCredentials>, PlanError> {
        let eff = self.effective().await?;
        let base_url = self.jira_value(&eff, JIRA_BASE_URL);
        let email = self.jira_value(&eff, JIRA_EMAIL);
        let api_token = self.jira_value(&eff, JIRA_API_TOKEN);
        Ok(match (base_url, email, api_token) {
            (Some(base_url), Some(email), Some(api_token)) => Some(TrackerCredentials {
                base_url: base_url.trim_end_matches('/').to_string(),
                email: email.to_string(),
                api_token: api_token.to_string(),
            }),
            _ => None,
        })
    }

    async fn default_provider(&self) -> Result<ProviderKind, PlanError> {
        let eff = self.effective().await?;
        Ok(eff
            .get(DEFAULT_PROVIDER)
            .and_then(|v| ProviderKind::from_str(v).ok())
            .or(self.defaults.default_provider)
            .unwrap_or(ProviderKind::Cloud))
    }

    async fn save_settings(&self, update: SettingsUpdate) -> Result<(), PlanError> {
        if let Some(t) = update.anthropic_temperature
            && !(0.0..=1.0).contains(&t)
        {
            return Err(PlanError::InvalidInput(format!(
                "anthropicTemperature must be between 0.0 and 1.0, got {t}"
            )));
        }

        let mut changes = Vec::new();
        let text_fields = [
            (JIRA_BASE_URL, update.jira_base_url.as_deref()),
            (JIRA_EMAIL, update.jira_email.as_deref()),
            (JIRA_API_TOKEN, update.jira_api_token.as_deref()),
            (ANTHROPIC_API_KEY, update.anthropic_api_key.as_deref()),
            (ANTHROPIC_MODEL, update.anthropic_model.as_deref()),
            (OLLAMA_BASE_URL, update.ollama_base_url.as_deref()),
            (OLLAMA_MODEL, update.ollama_model.as_deref()),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                changes.push(self.encode(key, value)?);
            }
        }
        if let Some(t) = update.anthropic_temperature {
            changes.push(self.encode(ANTHROPIC_TEMPERATURE, &t.to_string())?);
        }
        if let Some(kind) = update.default_provider {
            changes.push(self.encode(DEFAULT_PROVIDER, &kind.to_string())?);
        }

        let keys: Vec<&str> = changes.iter().map(|c| c.key).collect();
        debug!(?keys, "saving settings");
        q::apply_changes(&self.db, changes).await
    }

    async fn settings_view(&self) -> Result<SettingsView, PlanError> {
        let cloud = self.get_provider_config(ProviderKind::Cloud).await?;
        let local = self.get_provider_config(ProviderKind::Local).await?;
        let default_provider = self.default_provider().await?;
        let tracker_configured = self.get_tracker_credentials().await?.is_some();
        let eff = self.effective().await?;

        Ok(SettingsView {
            jira_base_url: self.jira_value(&eff, JIRA_BASE_URL).map(str::to_string),
            jira_email: self.jira_value(&eff, JIRA_EMAIL).map(str::to_string),
            jira_api_token: self.jira_value(&eff, JIRA_API_TOKEN).map(mask_secret),
            jira_configured: tracker_configured,
            anthropic_api_key: cloud.api_key.as_deref().map(mask_secret),
            anthropic_model: cloud.model,
            anthropic_temperature: cloud.temperature,
            ollama_base_url: local.base_url.unwrap_or_default(),
            ollama_model: local.model,
            ollama_temperature: local.temperature,
            default_provider,
        })
    }
}
