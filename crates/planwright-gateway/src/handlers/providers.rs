// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection checks and model listings.

use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use planwright_core::{ConnectionTest, PlanError, ProviderKind};

use crate::error::ApiResult;
use crate::extract::ApiPath;
use crate::state::AppState;

fn parse_kind(raw: &str) -> Result<ProviderKind, PlanError> {
    ProviderKind::from_str(raw).map_err(|_| {
        PlanError::InvalidInput(format!("unknown provider `{raw}` (expected cloud or local)"))
    })
}

/// POST /api/providers/{kind}/test
pub async fn test(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<String>,
) -> ApiResult<Json<ConnectionTest>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.generator.test_connection(kind).await))
}

/// GET /api/providers/{kind}/models
pub async fn models(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<String>,
) -> ApiResult<Json<Vec<String>>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.generator.list_models(kind).await?))
}

/// POST /api/jira/test
pub async fn test_jira(State(state): State<AppState>) -> Json<ConnectionTest> {
    Json(state.generator.test_tracker_connection().await)
}
