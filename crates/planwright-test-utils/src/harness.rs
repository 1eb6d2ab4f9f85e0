// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline tests.
//!
//! `TestHarness` wires a temp SQLite database, the real stores, a
//! [`MockTicketSource`], and mock providers into a [`Generator`].

use std::sync::Arc;

use futures::StreamExt;
use planwright_core::{
    CredentialStore, GenerationEvent, GenerationProvider, NewTemplate, PlanError, ProviderKind,
    SettingsUpdate, Template, TemplateStore,
};
use planwright_generator::{GenerationRequest, Generator, GeneratorParts};
use planwright_storage::{Database, SettingsDefaults, SqliteCredentialStore, SqliteStorage};
use planwright_vault::FieldCipher;
use planwright_vault::crypto::generate_random_key;

use crate::mock_provider::{MockProvider, MockProviderFactory};
use crate::mock_source::MockTicketSource;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    providers: Vec<MockProvider>,
    source: MockTicketSource,
    tracker_configured: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            providers: Vec::new(),
            source: MockTicketSource::new(),
            tracker_configured: true,
        }
    }

    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_source(mut self, source: MockTicketSource) -> Self {
        self.source = source;
        self
    }

    /// Leaves Jira credentials unset.
    pub fn without_tracker(mut self) -> Self {
        self.tracker_configured = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, PlanError> {
        let temp_dir = tempfile::TempDir::new().map_err(PlanError::storage)?;
        let db_path = temp_dir.path().join("test.db");
        let db = Database::open(&db_path.to_string_lossy()).await?;

        let storage = Arc::new(SqliteStorage::new(db.clone()));
        let defaults = SettingsDefaults {
            anthropic_model: "mock-model".into(),
            anthropic_temperature: 0.7,
            ollama_base_url: "http://localhost:11434".into(),
            ollama_model: "mock-model".into(),
            ollama_temperature: 0.7,
            ..SettingsDefaults::default()
        };
        let credentials = Arc::new(SqliteCredentialStore::new(
            db.clone(),
            FieldCipher::new(generate_random_key()?),
            defaults,
        ));
        if self.tracker_configured {
            credentials
                .save_settings(SettingsUpdate {
                    jira_base_url: Some("https://example.atlassian.net".into()),
                    jira_email: Some("qa@example.com".into()),
                    jira_api_token: Some("test-token".into()),
                    ..SettingsUpdate::default()
                })
                .await?;
        }

        let mut factory = MockProviderFactory::new();
        let mut providers = Vec::new();
        for provider in self.providers {
            let provider = Arc::new(provider);
            factory = factory.with(Arc::clone(&provider));
            providers.push(provider);
        }
        let source = Arc::new(self.source);

        let generator = Generator::new(GeneratorParts {
            tickets: storage.clone(),
            source: source.clone(),
            templates: storage.clone(),
            history: storage.clone(),
            credentials: credentials.clone(),
            providers: Arc::new(factory),
        });

        Ok(TestHarness {
            generator,
            storage,
            credentials,
            source,
            providers,
            db,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock upstreams and temp storage.
pub struct TestHarness {
    pub generator: Generator,
    /// Ticket cache, template store, and history store.
    pub storage: Arc<SqliteStorage>,
    pub credentials: Arc<SqliteCredentialStore>,
    pub source: Arc<MockTicketSource>,
    pub providers: Vec<Arc<MockProvider>>,
    pub db: Database,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Inserts a template row (no backing file).
    pub async fn add_template(
        &self,
        name: &str,
        content: &str,
        is_default: bool,
    ) -> Result<Template, PlanError> {
        self.storage
            .insert(NewTemplate {
                name: name.into(),
                file_path: format!("/nonexistent/{name}.md"),
                content: content.into(),
                is_default,
            })
            .await
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<&Arc<MockProvider>> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    /// Runs a generation to completion and returns every event.
    pub async fn run(
        &self,
        ticket_id: &str,
        template_id: Option<i64>,
        provider: ProviderKind,
    ) -> Vec<GenerationEvent> {
        self.generator
            .generate(GenerationRequest {
                ticket_id: ticket_id.into(),
                template_id,
                provider: Some(provider),
            })
            .collect()
            .await
    }
}
