// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the listening loop.

use std::future::Future;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use planwright_core::PlanError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, generate, history, providers, settings, templates, tickets};
use crate::state::AppState;

/// Largest accepted template upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/generate", post(generate::post_generate))
        .route("/generate-sync", post(generate::post_generate_sync))
        .route("/history", get(history::list))
        .route("/history/{id}", get(history::get).delete(history::delete))
        .route("/history/{id}/export", get(history::export))
        .route("/tickets", get(tickets::list))
        .route("/tickets/{key}", get(tickets::get).delete(tickets::delete))
        .route(
            "/templates",
            get(templates::list)
                .post(templates::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/templates/{id}",
            get(templates::get)
                .patch(templates::rename)
                .delete(templates::delete),
        )
        .route("/templates/{id}/default", post(templates::set_default))
        .route("/settings", get(settings::get).put(settings::put))
        .route("/providers/{kind}/test", post(providers::test))
        .route("/providers/{kind}/models", get(providers::models))
        .route("/jira/test", post(providers::test_jira));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host:port` and serves until `shutdown` resolves.
pub async fn serve(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), PlanError> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PlanError::Config(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("Planwright API listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PlanError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
