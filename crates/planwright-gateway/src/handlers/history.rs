// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use planwright_core::{HistoryEntry, PlanError};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

/// GET /api/history?limit=N
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let limit = state.limits.resolve(params.limit);
    Ok(Json(state.history.list_recent(limit).await?))
}

async fn load(state: &AppState, id: i64) -> Result<HistoryEntry, PlanError> {
    state
        .history
        .get(id)
        .await?
        .ok_or_else(|| PlanError::not_found("history entry", id))
}

/// GET /api/history/{id}
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<HistoryEntry>> {
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/history/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.history.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/history/{id}/export: the generated Markdown as a download.
pub async fn export(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<impl IntoResponse> {
    let entry = load(&state, id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(&entry.ticket_key, entry.id)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        entry.generated_content,
    ))
}

/// `test-plan-<ticket>-<id>.md`, restricted to filename-safe characters.
pub(crate) fn export_filename(ticket_key: &str, id: i64) -> String {
    let safe: String = ticket_key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("test-plan-{safe}-{id}.md")
}
