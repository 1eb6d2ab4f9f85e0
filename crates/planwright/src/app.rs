// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires configuration into the stores, ticket source, provider factory,
//! and generator.

use std::path::Path;
use std::sync::Arc;

use planwright_config::PlanwrightConfig;
use planwright_core::PlanError;
use planwright_generator::{DefaultProviderFactory, Generator, GeneratorParts};
use planwright_jira::JiraTicketSource;
use planwright_storage::{Database, SettingsDefaults, SqliteCredentialStore, SqliteStorage};
use planwright_templates::TemplateLibrary;
use planwright_vault::FieldCipher;
use planwright_vault::key::load_or_create_key;
use tracing::{debug, info};

/// Fully wired application components.
pub struct App {
    pub db: Database,
    pub storage: Arc<SqliteStorage>,
    pub credentials: Arc<SqliteCredentialStore>,
    pub generator: Generator,
    pub templates: TemplateLibrary,
}

impl App {
    pub async fn open(config: &PlanwrightConfig) -> Result<Self, PlanError> {
        let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
        info!(path = %config.storage.database_path, "database ready");

        let key = load_or_create_key(Path::new(&config.vault.key_file))?;
        let cipher = FieldCipher::new(key);

        let storage = Arc::new(SqliteStorage::new(db.clone()));
        let credentials = Arc::new(SqliteCredentialStore::new(
            db.clone(),
            cipher,
            SettingsDefaults::from(config),
        ));

        std::fs::create_dir_all(&config.storage.data_dir).map_err(PlanError::storage)?;
        let templates = TemplateLibrary::new(storage.clone(), &config.storage.data_dir);

        let providers = DefaultProviderFactory::new(
            credentials.clone(),
            config.anthropic.clone(),
            config.ollama.clone(),
        );
        let generator = Generator::new(GeneratorParts {
            tickets: storage.clone(),
            source: Arc::new(JiraTicketSource::new(&config.jira)?),
            templates: storage.clone(),
            history: storage.clone(),
            credentials: credentials.clone(),
            providers: Arc::new(providers),
        });
        debug!("generator wired");

        Ok(Self {
            db,
            storage,
            credentials,
            generator,
            templates,
        })
    }
}
