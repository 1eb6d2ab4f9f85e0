// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation pipeline: resolve ticket, resolve template, stream from
//! the provider, record history, finish.
//!
//! Stages run strictly in sequence inside one lazy stream. Dropping the
//! stream stops the provider and skips persistence.

use std::sync::Arc;

use futures::StreamExt;
use planwright_core::{
    ConnectionTest, CredentialStore, EventStream, GenerationContext, GenerationEvent,
    HistoryStore, NewHistoryRecord, PlanError, ProviderFactory, ProviderKind, Template,
    TemplateStore, Ticket, TicketCache, TicketSource, normalize_ticket_key,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Caller input for one generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub ticket_id: String,
    #[serde(default)]
    pub template_id: Option<i64>,
    /// Falls back to the persisted default provider when omitted.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

/// Result of a synchronous generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub content: String,
    pub ticket_id: String,
    pub provider: ProviderKind,
}

/// Collaborators the pipeline is wired to.
#[derive(Clone)]
pub struct GeneratorParts {
    pub tickets: Arc<dyn TicketCache>,
    pub source: Arc<dyn TicketSource>,
    pub templates: Arc<dyn TemplateStore>,
    pub history: Arc<dyn HistoryStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub providers: Arc<dyn ProviderFactory>,
}

/// Test-plan generation orchestrator. Cheap to clone; every request owns
/// its own context and accumulator.
#[derive(Clone)]
pub struct Generator {
    parts: Arc<GeneratorParts>,
}

impl Generator {
    pub fn new(parts: GeneratorParts) -> Self {
        Self {
            parts: Arc::new(parts),
        }
    }

    /// Runs the pipeline. The stream ends with exactly one `complete` or
    /// `error` event.
    pub fn generate(&self, request: GenerationRequest) -> EventStream {
        let parts = Arc::clone(&self.parts);

        Box::pin(async_stream::stream! {
            let key = match normalize_ticket_key(&request.ticket_id) {
                Ok(k) => k,
                Err(e) => {
                    yield GenerationEvent::error(&e);
                    return;
                }
            };
            let kind = match resolve_kind(&parts, request.provider).await {
                Ok(k) => k,
                Err(e) => {
                    yield GenerationEvent::error(&e);
                    return;
                }
            };
            info!(ticket_id = %key, provider = %kind, template_id = ?request.template_id, "generation started");

            // Stage 1: ticket.
            yield GenerationEvent::progress(format!("Loading ticket {key}..."), 5);
            let cached = match parts.tickets.get(&key).await {
                Ok(t) => t,
                Err(e) => {
                    warn!(ticket_id = %key, error = %e, "ticket cache lookup failed");
                    yield GenerationEvent::error(&e);
                    return;
                }
            };
            let ticket = match cached {
                Some(ticket) => {
                    debug!(ticket_id = %key, "ticket cache hit");
                    ticket
                }
                None => {
                    yield GenerationEvent::progress(format!("Fetching {key} from Jira..."), 10);
                    match fetch_and_cache(&parts, &key).await {
                        Ok(t) => t,
                        Err(e) => {
                            warn!(ticket_id = %key, error = %e, "ticket resolution failed");
                            yield GenerationEvent::error(&e);
                            return;
                        }
                    }
                }
            };

            // Stage 2: template.
            yield GenerationEvent::progress("Loading template...", 20);
            let template = match resolve_template(&parts, request.template_id).await {
                Ok(t) => t,
                Err(e) => {
                    warn!(ticket_id = %key, error = %e, "template resolution failed");
                    yield GenerationEvent::error(&e);
                    return;
                }
            };

            // Stage 3: provider and temperature.
            let provider = match parts.providers.provider(kind).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(provider = %kind, error = %e, "provider unavailable");
                    yield GenerationEvent::error(&e);
                    return;
                }
            };
            let ticket_row_id = ticket.id;
            let context = GenerationContext {
                ticket,
                template_content: template.content,
                temperature: provider.temperature(),
            };

            // Stage 4: stream. The accumulator, not the provider's final
            // payload, is what gets recorded.
            yield GenerationEvent::progress(format!("Generating test plan ({kind})..."), 30);
            let mut upstream = provider.generate(context);
            let mut accumulated = String::new();
            let mut final_payload = None;
            while let Some(event) = upstream.next().await {
                match event {
                    GenerationEvent::Content { data, progress } => {
                        accumulated.push_str(&data);
                        yield GenerationEvent::Content { data, progress };
                    }
                    GenerationEvent::Complete { data, .. } => {
                        final_payload = Some(data);
                        break;
                    }
                    GenerationEvent::Error { message, kind: error_kind } => {
                        warn!(ticket_id = %key, provider = %kind, kind = %error_kind, "generation failed");
                        yield GenerationEvent::Error { message, kind: error_kind };
                        return;
                    }
                    progress @ GenerationEvent::Progress { .. } => {
                        yield progress;
                    }
                }
            }
            drop(upstream);
            if accumulated.is_empty() {
                accumulated = final_payload.unwrap_or_default();
            }

            // Stage 5: best-effort history. The generation has already been
            // delivered; a failed write never fails the run.
            if !accumulated.is_empty() {
                yield GenerationEvent::progress("Saving to history...", 95);
                let record = NewHistoryRecord {
                    ticket_key: key.clone(),
                    ticket_id: ticket_row_id,
                    template_id: Some(template.id),
                    provider: kind.to_string(),
                    generated_content: accumulated.clone(),
                };
                match parts.history.append(record).await {
                    Ok(id) => debug!(history_id = id, "history recorded"),
                    Err(e) => warn!(ticket_id = %key, error = %e, "failed to record history"),
                }
            }

            info!(ticket_id = %key, provider = %kind, chars = accumulated.len(), "generation complete");
            yield GenerationEvent::complete(accumulated);
        })
    }

    /// Drives [`generate`](Self::generate) to its terminal event.
    pub async fn generate_sync(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, PlanError> {
        let ticket_id = normalize_ticket_key(&request.ticket_id)?;
        let kind = resolve_kind(&self.parts, request.provider).await?;
        let request = GenerationRequest {
            provider: Some(kind),
            ..request
        };

        let mut events = self.generate(request);
        while let Some(event) = events.next().await {
            match event {
                GenerationEvent::Complete { data, .. } => {
                    return Ok(GenerationOutcome {
                        content: data,
                        ticket_id,
                        provider: kind,
                    });
                }
                GenerationEvent::Error { message, kind } => {
                    return Err(PlanError::Reported { kind, message });
                }
                _ => {}
            }
        }
        Err(PlanError::Internal(
            "generation ended without a terminal event".into(),
        ))
    }

    /// Cache-or-fetch for a single ticket; `refresh` forces a re-fetch.
    pub async fn fetch_ticket(&self, ticket_id: &str, refresh: bool) -> Result<Ticket, PlanError> {
        let key = normalize_ticket_key(ticket_id)?;
        if !refresh {
            if let Some(ticket) = self.parts.tickets.get(&key).await? {
                return Ok(ticket);
            }
        }
        fetch_and_cache(&self.parts, &key).await
    }

    /// Checks a provider's reachability and credentials. Never fails.
    pub async fn test_connection(&self, kind: ProviderKind) -> ConnectionTest {
        match self.parts.providers.provider(kind).await {
            Ok(provider) => provider.test_connection().await,
            Err(e) => ConnectionTest::failed(e.to_string()),
        }
    }

    pub async fn list_models(&self, kind: ProviderKind) -> Result<Vec<String>, PlanError> {
        self.parts.providers.provider(kind).await?.list_models().await
    }

    /// Checks the saved tracker credentials. Never fails.
    pub async fn test_tracker_connection(&self) -> ConnectionTest {
        match self.parts.credentials.get_tracker_credentials().await {
            Ok(Some(creds)) => self.parts.source.test_connection(&creds).await,
            Ok(None) => ConnectionTest::failed("Jira credentials are not configured"),
            Err(e) => ConnectionTest::failed(e.to_string()),
        }
    }
}

async fn resolve_kind(
    parts: &GeneratorParts,
    requested: Option<ProviderKind>,
) -> Result<ProviderKind, PlanError> {
    match requested {
        Some(kind) => Ok(kind),
        None => parts.credentials.default_provider().await,
    }
}

/// Fetches from the tracker and upserts into the cache. Fails with
/// `Precondition` before any network call when credentials are missing.
async fn fetch_and_cache(parts: &GeneratorParts, key: &str) -> Result<Ticket, PlanError> {
    let creds = parts.credentials.get_tracker_credentials().await?.ok_or_else(|| {
        PlanError::Precondition(
            "Jira is not configured: set the base URL, email, and API token in settings".into(),
        )
    })?;
    let mut ticket = parts.source.fetch(&creds, key).await?;
    let id = parts.tickets.upsert(&ticket).await?;
    ticket.id = Some(id);
    info!(ticket_id = %ticket.key, row_id = id, "ticket cached");
    Ok(ticket)
}

async fn resolve_template(
    parts: &GeneratorParts,
    template_id: Option<i64>,
) -> Result<Template, PlanError> {
    if let Some(id) = template_id {
        if let Some(template) = parts.templates.get(id).await? {
            return Ok(template);
        }
        debug!(template_id = id, "template not found, falling back to default");
    }
    parts.templates.get_default().await?.ok_or_else(|| {
        PlanError::not_found(
            "template",
            template_id.map_or_else(|| "default".to_string(), |id| id.to_string()),
        )
    })
}
