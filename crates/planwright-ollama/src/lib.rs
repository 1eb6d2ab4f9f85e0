// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local generation provider backed by an Ollama daemon.
//!
//! The daemon streams NDJSON; each line's text is relayed as a `content`
//! event until a line with `"done": true` arrives.

pub mod client;
pub mod ndjson;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use planwright_config::model::OllamaConfig;
use planwright_core::prompt::build_messages;
use planwright_core::{
    ConnectionTest, EventStream, GenerationContext, GenerationEvent, GenerationProvider,
    PlanError, ProviderKind, ProviderSettings,
};
use tokio_util::codec::LinesCodecError;
use tracing::{debug, info, warn};

pub use client::OllamaClient;

use crate::types::{ChatChunk, ChatMessage, ChatOptions, ChatRequest};

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: OllamaClient,
    model: String,
    temperature: f32,
}

impl OllamaProvider {
    pub fn new(settings: &ProviderSettings, config: &OllamaConfig) -> Result<Self, PlanError> {
        let base_url = settings
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&config.base_url);
        let client = OllamaClient::new(base_url, Duration::from_secs(config.timeout_secs))?;
        info!(base_url = %client.base_url(), model = %settings.model, "ollama provider initialized");
        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn request(&self, context: &GenerationContext) -> ChatRequest {
        let prompt = build_messages(context);
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.user,
                },
            ],
            stream: true,
            options: ChatOptions {
                temperature: context.temperature,
            },
        }
    }
}

/// Outcome of one NDJSON line.
enum Line {
    Text(String),
    /// Final line, possibly with trailing text.
    Done(Option<String>),
    Skip,
    Failed(PlanError),
}

fn parse_line(line: &str) -> Line {
    let chunk: ChatChunk = match serde_json::from_str(line) {
        Ok(c) => c,
        Err(e) => {
            debug!(error = %e, "skipping malformed ollama line");
            return Line::Skip;
        }
    };
    if let Some(error) = chunk.error {
        return Line::Failed(PlanError::bad_gateway(format!("Ollama error: {error}")));
    }
    match (chunk.text(), chunk.done) {
        (text, true) => Line::Done(text.map(str::to_string)),
        (Some(text), false) => Line::Text(text.to_string()),
        (None, false) => Line::Skip,
    }
}

/// A body failure before any fragment means the daemon went away; after
/// that the stream was cut mid-generation.
fn stream_failure(client: &OllamaClient, err: LinesCodecError, fragments: usize) -> PlanError {
    let transport = match err {
        LinesCodecError::Io(io) => io
            .into_inner()
            .and_then(|inner| inner.downcast::<reqwest::Error>().ok()),
        LinesCodecError::MaxLineLengthExceeded => {
            return PlanError::bad_gateway(format!(
                "Ollama sent a line longer than {} bytes",
                ndjson::MAX_LINE_BYTES
            ));
        }
    };
    match transport {
        Some(e) if fragments == 0 => client.transport_error(*e),
        Some(e) => PlanError::BadGateway {
            message: "stream interrupted".into(),
            source: Some(e),
        },
        None => PlanError::bad_gateway("stream interrupted"),
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn generate(&self, context: GenerationContext) -> EventStream {
        let client = self.client.clone();
        let request = self.request(&context);

        Box::pin(async_stream::stream! {
            yield GenerationEvent::progress("Connecting to Ollama...", 30);

            let response = match client.chat(&request).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "ollama request failed");
                    yield GenerationEvent::error(&e);
                    return;
                }
            };

            let mut lines = ndjson::lines(response.bytes_stream());
            let mut full = String::new();
            let mut fragments = 0usize;

            while let Some(line) = lines.next().await {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        let err = stream_failure(&client, e, fragments);
                        warn!(error = %err, fragments, "ollama stream failed");
                        yield GenerationEvent::error(&err);
                        return;
                    }
                };
                match parse_line(&line) {
                    Line::Text(text) => {
                        fragments += 1;
                        full.push_str(&text);
                        yield GenerationEvent::content(text);
                    }
                    Line::Done(tail) => {
                        if let Some(text) = tail {
                            full.push_str(&text);
                            yield GenerationEvent::content(text);
                        }
                        debug!(fragments, chars = full.len(), "ollama stream complete");
                        yield GenerationEvent::complete(full);
                        return;
                    }
                    Line::Skip => {}
                    Line::Failed(err) => {
                        warn!(error = %err, "ollama reported an error");
                        yield GenerationEvent::error(&err);
                        return;
                    }
                }
            }

            // Clean EOF without a done line.
            yield GenerationEvent::complete(full);
        })
    }

    async fn test_connection(&self) -> ConnectionTest {
        match self.client.list_models().await {
            Ok(models) => ConnectionTest::ok(
                format!(
                    "Connected to Ollama at {} ({} models available)",
                    self.client.base_url(),
                    models.len()
                ),
                Some(models),
            ),
            Err(e) => ConnectionTest::failed(e.to_string()),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, PlanError> {
        self.client.list_models().await
    }
}
