// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template ingestion: uploads are written under the data directory, their
//! text is extracted once, and the row is recorded through a
//! [`TemplateStore`]. Deleting a template removes both the row and the file.

pub mod extract;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use planwright_core::{NewTemplate, PlanError, Template, TemplateStore};
use tracing::{info, warn};
use uuid::Uuid;

pub use extract::{TemplateFormat, extract_text};

/// Upload parameters.
#[derive(Debug, Clone)]
pub struct TemplateUpload {
    /// Display name; the file stem is used when blank.
    pub name: Option<String>,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub set_default: bool,
}

#[derive(Clone)]
pub struct TemplateLibrary {
    store: Arc<dyn TemplateStore>,
    data_dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(store: Arc<dyn TemplateStore>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
        }
    }

    /// Stores the file, extracts its text, and inserts the template row.
    pub async fn upload(&self, upload: TemplateUpload) -> Result<Template, PlanError> {
        let format = TemplateFormat::from_filename(&upload.filename)?;
        let name = display_name(upload.name.as_deref(), &upload.filename)?;

        let bytes = upload.bytes;
        let (bytes, content) = tokio::task::spawn_blocking(move || {
            let text = extract_text(format, &bytes);
            (bytes, text)
        })
        .await
        .map_err(|e| PlanError::Internal(format!("template extraction task failed: {e}")))?;
        let content = content?;

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(PlanError::storage)?;
        let path = self
            .data_dir
            .join(format!("{}.{}", Uuid::new_v4(), format.extension()));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(PlanError::storage)?;

        let inserted = self
            .store
            .insert(NewTemplate {
                name,
                file_path: path.to_string_lossy().into_owned(),
                content,
                is_default: upload.set_default,
            })
            .await;

        match inserted {
            Ok(template) => {
                info!(
                    template_id = template.id,
                    name = %template.name,
                    is_default = template.is_default,
                    "template uploaded"
                );
                Ok(template)
            }
            Err(e) => {
                remove_file(&path).await;
                Err(e)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Template>, PlanError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Template, PlanError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PlanError::not_found("template", id))
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Template, PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::InvalidInput("template name must not be empty".into()));
        }
        self.store.rename(id, name).await
    }

    pub async fn set_default(&self, id: i64) -> Result<Template, PlanError> {
        let template = self.store.set_default(id).await?;
        info!(template_id = id, "default template changed");
        Ok(template)
    }

    /// Deletes the row, then the backing file. A file that is already gone
    /// is only logged.
    pub async fn delete(&self, id: i64) -> Result<Template, PlanError> {
        let template = self.store.delete(id).await?;
        remove_file(Path::new(&template.file_path)).await;
        info!(template_id = id, "template deleted");
        Ok(template)
    }
}

fn display_name(name: Option<&str>, filename: &str) -> Result<String, PlanError> {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .unwrap_or_default();
    if stem.is_empty() {
        return Err(PlanError::InvalidInput("template name must not be empty".into()));
    }
    Ok(stem.to_string())
}

async fn remove_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove template file");
    }
}
