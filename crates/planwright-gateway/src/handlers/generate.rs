// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! POST /api/generate (SSE) and POST /api/generate-sync.
//!
//! Stream format, one JSON object per `data:` line:
//! ```text
//! data: {"type":"progress","message":"Loading ticket QA-1...","progress":5}
//! data: {"type":"content","data":"# Test Plan"}
//! data: {"type":"complete","data":"# Test Plan ...","progress":100}
//! data: {"type":"done"}
//! ```

use std::convert::Infallible;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use planwright_core::{GenerationEvent, PlanError};
use planwright_generator::{GenerationOutcome, GenerationRequest};
use tracing::{debug, warn};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

const DONE: &str = r#"{"type":"done"}"#;

/// Serializes one generation event as an SSE frame.
pub(crate) fn to_sse(event: &GenerationEvent) -> Event {
    match serde_json::to_string(event) {
        Ok(json) => Event::default().data(json),
        Err(e) => {
            warn!(error = %e, "failed to serialize generation event");
            Event::default().data(
                serde_json::json!({
                    "type": "error",
                    "kind": "internal",
                    "message": "failed to serialize event",
                })
                .to_string(),
            )
        }
    }
}

pub async fn post_generate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerationRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(ticket_id = %request.ticket_id, "streaming generation requested");
    let events = state
        .generator
        .generate(request)
        .map(|event| Ok(to_sse(&event)));
    let done = stream::once(async { Ok(Event::default().data(DONE)) });

    Sse::new(events.chain(done)).keep_alive(KeepAlive::default())
}

pub async fn post_generate_sync(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GenerationRequest>,
) -> ApiResult<Json<GenerationOutcome>> {
    let outcome = tokio::time::timeout(state.sync_timeout, state.generator.generate_sync(request))
        .await
        .map_err(|_| PlanError::Timeout {
            duration: state.sync_timeout,
        })??;
    Ok(Json(outcome))
}
