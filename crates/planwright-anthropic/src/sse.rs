// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for Messages API streaming responses.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use planwright_core::PlanError;

use crate::types::{ErrorEnvelope, SseContentBlockDelta, SseDelta, SseMessageDelta};

/// The subset of streaming events the provider acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text fragment.
    Text(String),
    /// `message_delta` carrying a stop reason.
    Stop(Option<String>),
    MessageStop,
    /// In-band `error` event.
    Error { kind: String, message: String },
}

/// Parses a streaming response into [`StreamEvent`]s. Pings, block
/// boundaries, non-text deltas, and unknown event names are skipped.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, PlanError>> + Send>> {
    let events = response.bytes_stream().eventsource();

    let mapped = events.filter_map(|result| async move {
        match result {
            Ok(event) => parse_event(&event.event, &event.data).transpose(),
            Err(e) => Some(Err(PlanError::bad_gateway(format!(
                "stream interrupted: {e}"
            )))),
        }
    });

    Box::pin(mapped)
}

fn parse_event(name: &str, data: &str) -> Result<Option<StreamEvent>, PlanError> {
    let malformed = |e: serde_json::Error| PlanError::BadGateway {
        message: format!("malformed {name} event: {e}"),
        source: Some(Box::new(e)),
    };
    let event = match name {
        "content_block_delta" => {
            match serde_json::from_str::<SseContentBlockDelta>(data).map_err(malformed)?.delta {
                SseDelta::TextDelta { text } => Some(StreamEvent::Text(text)),
                SseDelta::Other => None,
            }
        }
        "message_delta" => Some(StreamEvent::Stop(
            serde_json::from_str::<SseMessageDelta>(data)
                .map_err(malformed)?
                .delta
                .stop_reason,
        )),
        "message_stop" => Some(StreamEvent::MessageStop),
        "error" => {
            let err = serde_json::from_str::<ErrorEnvelope>(data).map_err(malformed)?;
            Some(StreamEvent::Error {
                kind: err.error.type_,
                message: err.error.message,
            })
        }
        _ => None,
    };
    Ok(event)
}
