// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use planwright_core::{Ticket, normalize_ticket_key};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/tickets: cached tickets, most recently fetched first.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Ticket>>> {
    Ok(Json(state.tickets.list().await?))
}

/// GET /api/tickets/{key}?refresh=true
pub async fn get(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
    ApiQuery(params): ApiQuery<GetParams>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.generator.fetch_ticket(&key, params.refresh).await?))
}

/// DELETE /api/tickets/{key}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> ApiResult<StatusCode> {
    let key = normalize_ticket_key(&key)?;
    state.tickets.delete(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
