// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use planwright_config::PlanwrightConfig;
use planwright_core::PlanError;

const REDACTED: &str = "[redacted]";

/// Runs `planwright check-config`: prints the effective configuration as
/// TOML with secrets replaced.
pub fn run_check_config(config: &PlanwrightConfig) -> Result<(), PlanError> {
    println!("{}", render(config)?);
    eprintln!("planwright: configuration is valid");
    Ok(())
}

fn render(config: &PlanwrightConfig) -> Result<String, PlanError> {
    let mut shown = config.clone();
    if shown.jira.api_token.is_some() {
        shown.jira.api_token = Some(REDACTED.into());
    }
    if shown.anthropic.api_key.is_some() {
        shown.anthropic.api_key = Some(REDACTED.into());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| PlanError::Internal(format!("cannot render configuration: {e}")))
}
