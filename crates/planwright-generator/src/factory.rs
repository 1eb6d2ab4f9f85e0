// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps a provider selection onto a provider bound to the current settings.

use std::sync::Arc;

use async_trait::async_trait;
use planwright_anthropic::AnthropicProvider;
use planwright_config::model::{AnthropicConfig, OllamaConfig};
use planwright_core::{
    CredentialStore, GenerationProvider, PlanError, ProviderFactory, ProviderKind,
};
use planwright_ollama::OllamaProvider;
use tracing::debug;

/// Builds a fresh provider per request so saved settings take effect
/// without a restart.
pub struct DefaultProviderFactory {
    credentials: Arc<dyn CredentialStore>,
    anthropic: AnthropicConfig,
    ollama: OllamaConfig,
}

impl DefaultProviderFactory {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        anthropic: AnthropicConfig,
        ollama: OllamaConfig,
    ) -> Self {
        Self {
            credentials,
            anthropic,
            ollama,
        }
    }
}

#[async_trait]
impl ProviderFactory for DefaultProviderFactory {
    async fn provider(&self, kind: ProviderKind) -> Result<Arc<dyn GenerationProvider>, PlanError> {
        let settings = self.credentials.get_provider_config(kind).await?;
        debug!(provider = %kind, model = %settings.model, "building provider");
        let provider: Arc<dyn GenerationProvider> = match kind {
            ProviderKind::Cloud => Arc::new(AnthropicProvider::new(&settings, &self.anthropic)?),
            ProviderKind::Local => Arc::new(OllamaProvider::new(&settings, &self.ollama)?),
        };
        Ok(provider)
    }
}
