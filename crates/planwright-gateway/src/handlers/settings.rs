// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use axum::Json;
use axum::extract::State;
use planwright_core::{SettingsUpdate, SettingsView};
use tracing::info;

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/settings (secrets masked)
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<SettingsView>> {
    Ok(Json(state.credentials.settings_view().await?))
}

/// PUT /api/settings: partial update; returns the new masked view.
pub async fn put(
    State(state): State<AppState>,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Json<SettingsView>> {
    state.credentials.save_settings(update).await?;
    info!("settings updated");
    Ok(Json(state.credentials.settings_view().await?))
}
