// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every problem instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::PlanwrightConfig;

pub fn validate_config(config: &PlanwrightConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config.server.port == 0 {
        errors.push(ConfigError::validation("server.port must not be 0"));
    }

    for (key, value) in [
        ("storage.database_path", &config.storage.database_path),
        ("storage.data_dir", &config.storage.data_dir),
        ("vault.key_file", &config.vault.key_file),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{key} must not be empty")));
        }
    }

    for (key, value) in [
        ("anthropic.temperature", config.anthropic.temperature),
        ("ollama.temperature", config.ollama.temperature),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::validation(format!(
                "{key} must be between 0.0 and 1.0, got {value}"
            )));
        }
    }

    check_url(&mut errors, "ollama.base_url", Some(&config.ollama.base_url));
    check_url(&mut errors, "jira.base_url", config.jira.base_url.as_ref());

    if !matches!(
        config.generation.default_provider.to_ascii_lowercase().as_str(),
        "cloud" | "local" | "anthropic" | "claude" | "ollama"
    ) {
        errors.push(ConfigError::validation(format!(
            "generation.default_provider must be `cloud` or `local`, got `{}`",
            config.generation.default_provider
        )));
    }

    if config.generation.history_list_default == 0 {
        errors.push(ConfigError::validation(
            "generation.history_list_default must be at least 1",
        ));
    }
    if config.generation.history_list_default > config.generation.history_list_max {
        errors.push(ConfigError::validation(format!(
            "generation.history_list_default ({}) exceeds generation.history_list_max ({})",
            config.generation.history_list_default, config.generation.history_list_max
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: Option<&String>) {
    let Some(value) = value else { return };
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigError::validation(format!(
            "{key} must use http or https, got `{}`",
            url.scheme()
        ))),
        Err(e) => errors.push(ConfigError::validation(format!(
            "{key} `{value}` is not a valid URL: {e}"
        ))),
    }
}
