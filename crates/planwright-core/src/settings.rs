// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings resolved from the credential store.

use serde::{Deserialize, Serialize};

use crate::types::ProviderKind;

/// Provider configuration bound at request time.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// API key (cloud only).
    pub api_key: Option<String>,
    /// Daemon address (local only).
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Issue-tracker credentials. Only constructed when every field is present.
#[derive(Clone, PartialEq, Eq)]
pub struct TrackerCredentials {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl std::fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"[redacted]")
            .finish()
    }
}

/// Partial settings update. `None` leaves a value untouched; an empty string
/// clears it.
#[derive(Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsUpdate {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: Option<String>,
    pub anthropic_temperature: Option<f32>,
    pub ollama_base_url: Option<String>,
    pub ollama_model: Option<String>,
    pub default_provider: Option<ProviderKind>,
}

impl std::fmt::Debug for SettingsUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsUpdate")
            .field("jira_base_url", &self.jira_base_url)
            .field("jira_email", &self.jira_email)
            .field(
                "jira_api_token",
                &self.jira_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_temperature", &self.anthropic_temperature)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("ollama_model", &self.ollama_model)
            .field("default_provider", &self.default_provider)
            .finish()
    }
}

/// Effective settings for display. Secrets are masked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub jira_configured: bool,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_temperature: f32,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_temperature: f32,
    pub default_provider: ProviderKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_secrets() {
        let creds = TrackerCredentials {
            base_url: "https://acme.atlassian.net".into(),
            email: "qa@acme.io".into(),
            api_token: "atl-secret-token".into(),
        };
        let out = format!("{creds:?}");
        assert!(!out.contains("atl-secret-token"));
        assert!(out.contains("[redacted]"));

        let settings = ProviderSettings {
            kind: ProviderKind::Cloud,
            api_key: Some("sk-ant-very-secret".into()),
            base_url: None,
            model: "claude-sonnet-4-20250514".into(),
            temperature: 0.7,
        };
        assert!(!format!("{settings:?}").contains("very-secret"));
    }

    #[test]
    fn update_deserializes_camel_case() {
        let update: SettingsUpdate = serde_json::from_str(
            r#"{"jiraBaseUrl":"https://x.atlassian.net","defaultProvider":"Ollama"}"#,
        )
        .unwrap();
        assert_eq!(update.jira_base_url.as_deref(), Some("https://x.atlassian.net"));
        assert_eq!(update.default_provider, Some(ProviderKind::Local));
        assert!(update.anthropic_api_key.is_none());
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result = serde_json::from_str::<SettingsUpdate>(r#"{"jiraPassword":"x"}"#);
        assert!(result.is_err());
    }
}
