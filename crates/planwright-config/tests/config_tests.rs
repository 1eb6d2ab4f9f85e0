// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use planwright_config::{ConfigError, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[storage]
database_path = "/tmp/planwright-test.db"
data_dir = "/tmp/planwright-templates"
wal_mode = false

[jira]
base_url = "https://acme.atlassian.net"
email = "qa@acme.io"
api_token = "atl-token"
acceptance_criteria_field = "customfield_10020"

[anthropic]
api_key = "sk-ant-123"
default_model = "claude-3-5-haiku-20241022"
temperature = 0.2

[ollama]
base_url = "http://10.0.0.5:11434"
default_model = "mistral"

[generation]
default_provider = "local"
history_list_default = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/planwright-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.jira.email.as_deref(), Some("qa@acme.io"));
    assert_eq!(
        config.jira.acceptance_criteria_field.as_deref(),
        Some("customfield_10020")
    );
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-123"));
    assert!((config.anthropic.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.ollama.default_model, "mistral");
    assert_eq!(config.generation.default_provider, "local");
    assert_eq!(config.generation.history_list_default, 10);
    assert_eq!(config.generation.history_list_max, 100);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.anthropic.api_version, "2023-06-01");
    assert_eq!(config.ollama.timeout_secs, 600);
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = "[jira]\napi_tokn = \"x\"\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key should be rejected");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "api_tokn");
            assert_eq!(suggestion.as_deref(), Some("api_token"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert!(key.contains("port")),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str("[ollama]\ntemperature = 3.0\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
    assert!(errors[0].to_string().contains("ollama.temperature"));
}
