// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud generation provider backed by the Anthropic Messages API.
//!
//! Text deltas are relayed as `content` events as they arrive; every fifth
//! fragment also carries an approximate progress value.

pub mod client;
pub mod sse;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use planwright_config::model::AnthropicConfig;
use planwright_core::prompt::build_messages;
use planwright_core::{
    ConnectionTest, EventStream, GenerationContext, GenerationEvent, GenerationProvider,
    PlanError, ProviderKind, ProviderSettings,
};
use tracing::{debug, info, warn};

pub use client::AnthropicClient;

use crate::sse::StreamEvent;
use crate::types::{ApiMessage, MessageRequest};

/// Models offered in the settings UI.
pub const KNOWN_MODELS: &[&str] = &[
    "claude-sonnet-4-20250514",
    "claude-opus-4-20250514",
    "claude-3-7-sonnet-20250219",
    "claude-3-5-haiku-20241022",
];

/// Content events between progress updates.
const PROGRESS_EVERY: usize = 5;

/// Progress for the `n`th fragment: climbs from 30 and caps at 90.
pub(crate) fn fragment_progress(n: usize) -> u8 {
    (30 + n / 2).min(90) as u8
}

#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Builds a provider from resolved settings. Fails with `Precondition`
    /// when no API key is configured.
    pub fn new(settings: &ProviderSettings, config: &AnthropicConfig) -> Result<Self, PlanError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                PlanError::Precondition("Anthropic API key is not configured".into())
            })?;
        let client = AnthropicClient::new(
            api_key,
            &config.api_version,
            Duration::from_secs(config.timeout_secs),
        )?;
        let client = match settings.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => client.with_base_url(url),
            _ => client,
        };
        info!(model = %settings.model, "anthropic provider initialized");
        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request(&self, context: &GenerationContext) -> MessageRequest {
        let prompt = build_messages(context);
        MessageRequest {
            model: self.model.clone(),
            system: prompt.system,
            messages: vec![ApiMessage {
                role: "user".into(),
                content: prompt.user,
            }],
            max_tokens: self.max_tokens,
            temperature: context.temperature,
            stream: true,
        }
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cloud
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn generate(&self, context: GenerationContext) -> EventStream {
        let client = self.client.clone();
        let request = self.request(&context);

        Box::pin(async_stream::stream! {
            yield GenerationEvent::progress("Connecting to Claude...", 30);

            let mut upstream = match client.stream_message(&request).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "anthropic request failed");
                    yield GenerationEvent::error(&e);
                    return;
                }
            };

            let mut full = String::new();
            let mut fragments = 0usize;
            while let Some(event) = upstream.next().await {
                match event {
                    Ok(StreamEvent::Text(text)) => {
                        fragments += 1;
                        full.push_str(&text);
                        let progress = (fragments % PROGRESS_EVERY == 0)
                            .then(|| fragment_progress(fragments));
                        yield GenerationEvent::Content { data: text, progress };
                    }
                    Ok(StreamEvent::Stop(reason)) => {
                        debug!(stop_reason = ?reason, "anthropic message delta");
                    }
                    Ok(StreamEvent::MessageStop) => {
                        debug!(fragments, chars = full.len(), "anthropic stream complete");
                        yield GenerationEvent::complete(full);
                        return;
                    }
                    Ok(StreamEvent::Error { kind, message }) => {
                        let err = match kind.as_str() {
                            "rate_limit_error" => PlanError::RateLimited(message),
                            "authentication_error" | "permission_error" => {
                                PlanError::Unauthorized(message)
                            }
                            _ => PlanError::bad_gateway(format!("{kind}: {message}")),
                        };
                        warn!(error = %err, "anthropic stream error");
                        yield GenerationEvent::error(&err);
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, fragments, "anthropic stream failed");
                        yield GenerationEvent::error(&e);
                        return;
                    }
                }
            }

            // Body ended without message_stop.
            yield GenerationEvent::complete(full);
        })
    }

    async fn test_connection(&self) -> ConnectionTest {
        let request = MessageRequest {
            model: self.model.clone(),
            system: String::new(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "ping".into(),
            }],
            max_tokens: 1,
            temperature: 0.0,
            stream: false,
        };
        match self.client.complete_message(&request).await {
            Ok(resp) => ConnectionTest::ok(
                format!("Connected to Anthropic ({})", resp.model),
                Some(KNOWN_MODELS.iter().map(|m| m.to_string()).collect()),
            ),
            Err(e) => ConnectionTest::failed(e.to_string()),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, PlanError> {
        Ok(KNOWN_MODELS.iter().map(|m| m.to_string()).collect())
    }
}
