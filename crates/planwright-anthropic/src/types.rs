// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<ApiMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming response; only the fields Planwright reads.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub model: String,
    #[serde(default)]
    pub content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SseContentBlockDelta {
    pub delta: SseDelta,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SseDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SseMessageDelta {
    pub delta: SseMessageDeltaInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SseMessageDeltaInfo {
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// `{"type":"error","error":{..}}`, both as a non-2xx body and as an
/// in-band `error` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_flat_system_prompt() {
        let req = MessageRequest {
            model: "claude-sonnet-4-20250514".into(),
            system: "You are a QA expert.".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "Plan QA-1".into(),
            }],
            max_tokens: 4096,
            temperature: 0.7,
            stream: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["system"], "You are a QA expert.");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn unknown_delta_types_are_tolerated() {
        let d: SseContentBlockDelta =
            serde_json::from_str(r#"{"index":0,"delta":{"type":"thinking_delta","thinking":"x"}}"#)
                .unwrap();
        assert!(matches!(d.delta, SseDelta::Other));
    }
}
