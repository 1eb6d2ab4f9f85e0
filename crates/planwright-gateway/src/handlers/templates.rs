// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Template management. Uploads are `multipart/form-data` with a `file`
//! part and optional `name` and `is_default` text parts.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use planwright_core::{PlanError, Template};
use planwright_templates::TemplateUpload;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenameBody {
    pub name: String,
}

fn multipart_error(e: MultipartError) -> PlanError {
    PlanError::InvalidInput(format!("malformed upload: {}", e.body_text()))
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// GET /api/templates
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Template>>> {
    Ok(Json(state.templates.list().await?))
}

/// POST /api/templates
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Template>)> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut name = None;
    let mut set_default = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| PlanError::InvalidInput("file part has no filename".into()))?;
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("name") => name = Some(field.text().await.map_err(multipart_error)?),
            Some("is_default") | Some("isDefault") => {
                set_default = parse_flag(&field.text().await.map_err(multipart_error)?);
            }
            other => debug!(field = ?other, "ignoring upload field"),
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| PlanError::InvalidInput("missing `file` part".into()))?;
    let template = state
        .templates
        .upload(TemplateUpload {
            name,
            filename,
            bytes,
            set_default,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates/{id}
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Template>> {
    Ok(Json(state.templates.get(id).await?))
}

/// PATCH /api/templates/{id}
pub async fn rename(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<RenameBody>,
) -> ApiResult<Json<Template>> {
    Ok(Json(state.templates.rename(id, &body.name).await?))
}

/// POST /api/templates/{id}/default
pub async fn set_default(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Template>> {
    Ok(Json(state.templates.set_default(id).await?))
}

/// DELETE /api/templates/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.templates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
