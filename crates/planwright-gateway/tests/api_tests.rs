// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end HTTP tests against the router with mock upstreams.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use planwright_core::{PlanError, ProviderKind};
use planwright_gateway::{AppState, HistoryLimits, router};
use planwright_templates::TemplateLibrary;
use planwright_test_utils::{MockProvider, MockTicketSource, TestHarness, sample_ticket};
use serde_json::{Value, json};
use tower::ServiceExt;

const LIMIT: usize = 1024 * 1024;

struct Api {
    app: Router,
    harness: TestHarness,
    _uploads: tempfile::TempDir,
}

async fn api_with(harness: TestHarness) -> Api {
    let uploads = tempfile::TempDir::new().unwrap();
    let state = AppState {
        generator: harness.generator.clone(),
        templates: TemplateLibrary::new(harness.storage.clone(), uploads.path()),
        tickets: harness.storage.clone(),
        history: harness.storage.clone(),
        credentials: harness.credentials.clone(),
        limits: HistoryLimits::default(),
        sync_timeout: Duration::from_secs(5),
    };
    Api {
        app: router(state),
        harness,
        _uploads: uploads,
    }
}

async fn api() -> Api {
    let harness = TestHarness::builder()
        .with_source(MockTicketSource::new().with_ticket(sample_ticket("QA-1")))
        .with_provider(MockProvider::streaming(
            ProviderKind::Local,
            &["# Plan\n", "- step one"],
        ))
        .build()
        .await
        .unwrap();
    api_with(harness).await
}

impl Api {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), LIMIT)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = self.send(request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn sse_payloads(body: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(body)
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

fn multipart(boundary: &str, filename: &str, content: &str, name: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(name) = name {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"is_default\"\r\n\r\ntrue\r\n"
    ));
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/markdown\r\n\r\n{content}\r\n--{boundary}--\r\n"
    ));
    body
}

#[tokio::test]
async fn health_reports_version() {
    let api = api().await;
    let (status, body) = api.json("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn generate_streams_events_then_done() {
    let api = api().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"ticketId": "qa-1", "provider": "local"}).to_string(),
        ))
        .unwrap();
    let response = api.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    let body = axum::body::to_bytes(response.into_body(), LIMIT)
        .await
        .unwrap();

    let events = sse_payloads(&body);
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types.first(), Some(&"progress"));
    assert_eq!(&types[types.len() - 2..], &["complete", "done"]);
    let complete = &events[events.len() - 2];
    assert_eq!(complete["data"], "# Plan\n- step one");
    assert_eq!(complete["progress"], 100);
}

#[tokio::test]
async fn generate_reports_errors_in_band() {
    let api = api().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"ticketId": "QA-404", "provider": "local"}).to_string(),
        ))
        .unwrap();
    let (status, body) = api.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let events = sse_payloads(&body);
    let error = &events[events.len() - 2];
    assert_eq!(error["type"], "error");
    assert_eq!(error["kind"], "not_found");
    assert_eq!(events.last().unwrap()["type"], "done");
}

#[tokio::test]
async fn generate_sync_returns_content_and_records_history() {
    let api = api().await;
    let (status, body) = api
        .json(
            "POST",
            "/api/generate-sync",
            Some(json!({"ticketId": "QA-1", "provider": "ollama"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "# Plan\n- step one");
    assert_eq!(body["ticketId"], "QA-1");
    assert_eq!(body["provider"], "local");

    let (status, history) = api.json("GET", "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ticketKey"], "QA-1");
    assert_eq!(entries[0]["ticketSummary"], "QA-1: password reset email");
}

#[tokio::test]
async fn generate_sync_accepts_provider_aliases_in_any_case() {
    let api = api().await;
    for provider in ["OLLAMA", "Local"] {
        let (status, body) = api
            .json(
                "POST",
                "/api/generate-sync",
                Some(json!({"ticketId": "QA-1", "provider": provider})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{provider}");
        assert_eq!(body["provider"], "local");
    }
}

#[tokio::test]
async fn generate_sync_maps_error_kind_to_status() {
    let harness = TestHarness::builder()
        .without_tracker()
        .with_provider(MockProvider::streaming(ProviderKind::Local, &["x"]))
        .build()
        .await
        .unwrap();
    let api = api_with(harness).await;

    let (status, body) = api
        .json(
            "POST",
            "/api/generate-sync",
            Some(json!({"ticketId": "QA-1", "provider": "local"})),
        )
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["error"]["kind"], "precondition");
}

#[tokio::test]
async fn generate_sync_rejects_bad_ticket_key() {
    let api = api().await;
    let (status, body) = api
        .json("POST", "/api/generate-sync", Some(json!({"ticketId": "nope"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn generate_sync_surfaces_upstream_failure() {
    let harness = TestHarness::builder()
        .with_source(MockTicketSource::new().with_ticket(sample_ticket("QA-1")))
        .with_provider(MockProvider::failing_after(
            ProviderKind::Cloud,
            &["partial"],
            &PlanError::RateLimited("slow down".into()),
        ))
        .build()
        .await
        .unwrap();
    let api = api_with(harness).await;

    let (status, body) = api
        .json(
            "POST",
            "/api/generate-sync",
            Some(json!({"ticketId": "QA-1", "provider": "cloud"})),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["kind"], "rate_limited");
    let (_, history) = api.json("GET", "/api/history", None).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn history_get_export_and_delete() {
    let api = api().await;
    api.json(
        "POST",
        "/api/generate-sync",
        Some(json!({"ticketId": "QA-1", "provider": "local"})),
    )
    .await;
    let (_, history) = api.json("GET", "/api/history?limit=5", None).await;
    let id = history[0]["id"].as_i64().unwrap();

    let (status, entry) = api.json("GET", &format!("/api/history/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["generatedContent"], "# Plan\n- step one");

    let request = Request::builder()
        .uri(format!("/api/history/{id}/export"))
        .body(Body::empty())
        .unwrap();
    let response = api.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"test-plan-QA-1-{id}.md\"").as_str()
    );

    let (status, _) = api
        .json("DELETE", &format!("/api/history/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = api.json("GET", &format!("/api/history/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");
}

#[tokio::test]
async fn ticket_endpoints_use_the_cache() {
    let api = api().await;
    let (status, ticket) = api.json("GET", "/api/tickets/qa-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["key"], "QA-1");
    assert_eq!(ticket["acceptanceCriteria"], "- link expires after 1h");

    api.json("GET", "/api/tickets/QA-1", None).await;
    assert_eq!(api.harness.source.fetches(), 1);
    api.json("GET", "/api/tickets/QA-1?refresh=true", None).await;
    assert_eq!(api.harness.source.fetches(), 2);

    let (_, list) = api.json("GET", "/api/tickets", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = api.json("DELETE", "/api/tickets/QA-1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = api.json("GET", "/api/tickets", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn template_upload_rename_default_delete() {
    let api = api().await;
    let boundary = "planwright-boundary";
    let request = Request::builder()
        .method("POST")
        .uri("/api/templates")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart(
            boundary,
            "regression.md",
            "# Scope\n# Cases",
            None,
        )))
        .unwrap();
    let (status, body) = api.send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    let template: Value = serde_json::from_slice(&body).unwrap();
    let id = template["id"].as_i64().unwrap();
    assert_eq!(template["name"], "regression");
    assert_eq!(template["content"], "# Scope\n# Cases");
    assert_eq!(template["isDefault"], true);

    let (status, renamed) = api
        .json(
            "PATCH",
            &format!("/api/templates/{id}"),
            Some(json!({"name": "Regression suite"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Regression suite");

    let other = api
        .harness
        .add_template("smoke", "# Smoke", false)
        .await
        .unwrap();
    let (status, promoted) = api
        .json("POST", &format!("/api/templates/{}/default", other.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["isDefault"], true);
    let (_, first) = api.json("GET", &format!("/api/templates/{id}"), None).await;
    assert_eq!(first["isDefault"], false);

    let (status, _) = api
        .json("DELETE", &format!("/api/templates/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = api.json("GET", "/api/templates", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn template_upload_rejects_unsupported_format() {
    let api = api().await;
    let boundary = "b";
    let request = Request::builder()
        .method("POST")
        .uri("/api/templates")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart(boundary, "plan.docx", "x", Some("Plan"))))
        .unwrap();
    let (status, body) = api.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn settings_round_trip_masks_secrets() {
    let api = api().await;
    let (status, view) = api
        .json(
            "PUT",
            "/api/settings",
            Some(json!({
                "anthropicApiKey": "sk-ant-secret-value",
                "defaultProvider": "cloud",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["defaultProvider"], "cloud");
    assert_eq!(view["jiraConfigured"], true);
    let raw = view.to_string();
    assert!(!raw.contains("sk-ant-secret-value"));
    assert!(!raw.contains("test-token"));

    let (_, again) = api.json("GET", "/api/settings", None).await;
    assert_eq!(again, view);
}

#[tokio::test]
async fn settings_reject_unknown_fields() {
    let api = api().await;
    let (status, body) = api
        .json("PUT", "/api/settings", Some(json!({"bogus": 1})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");
    assert!(body["error"]["message"].as_str().unwrap().contains("bogus"));
}

#[tokio::test]
async fn malformed_requests_use_the_error_envelope() {
    let api = api().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/generate-sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"ticketId\": "))
        .unwrap();
    let (status, bytes) = api.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["kind"], "invalid_input");

    let cases = [
        ("POST", "/api/generate-sync", Some(json!({"templateId": 1}))),
        (
            "POST",
            "/api/generate-sync",
            Some(json!({"ticketId": "QA-1", "provider": "gemini"})),
        ),
        ("GET", "/api/history/abc", None),
        ("GET", "/api/history?limit=lots", None),
        ("PATCH", "/api/templates/x", Some(json!({"name": "n"}))),
        ("PATCH", "/api/templates/1", Some(json!({"title": "n"}))),
    ];
    for (method, uri, payload) in cases {
        let (status, body) = api.json(method, uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["error"]["kind"], "invalid_input", "{method} {uri}");
    }

    let request = Request::builder()
        .method("PUT")
        .uri("/api/settings")
        .body(Body::from("{}"))
        .unwrap();
    let (status, bytes) = api.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["kind"], "invalid_input");
}

#[tokio::test]
async fn provider_checks() {
    let api = api().await;
    let (status, test) = api.json("POST", "/api/providers/local/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(test["success"], true);

    let (status, models) = api.json("GET", "/api/providers/ollama/models", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(models, json!(["mock-model"]));

    // No cloud provider is registered with the harness.
    let (status, test) = api.json("POST", "/api/providers/cloud/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(test["success"], false);

    let (status, body) = api.json("GET", "/api/providers/gemini/models", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "invalid_input");

    let (status, jira) = api.json("POST", "/api/jira/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(jira["message"], "Connected to Jira as qa@example.com");
}

#[tokio::test]
async fn unknown_template_id_is_not_found() {
    let api = api().await;
    let (status, body) = api.json("GET", "/api/templates/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");
}
