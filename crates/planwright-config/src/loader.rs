// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/planwright/planwright.toml`
//! 3. `~/.config/planwright/planwright.toml`
//! 4. `./planwright.toml`
//! 5. `PLANWRIGHT_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlanwrightConfig;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/planwright/planwright.toml";
pub const LOCAL_CONFIG_PATH: &str = "planwright.toml";

/// Env sections, longest first so `anthropic_` never shadows a later prefix.
const ENV_SECTIONS: &[&str] = &[
    "generation",
    "anthropic",
    "storage",
    "server",
    "ollama",
    "vault",
    "jira",
];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("planwright").join("planwright.toml"))
}

/// Every file the default loader consults, in merge order.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(user) = user_config_path() {
        paths.push(user);
    }
    paths.push(PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// Builds the default figment without extracting it.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(PlanwrightConfig::default()));
    for path in config_file_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Loads configuration from the standard hierarchy with env overrides.
pub fn load_config() -> Result<PlanwrightConfig, figment::Error> {
    build_figment().extract()
}

/// Loads configuration from one explicit file plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlanwrightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlanwrightConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Loads configuration from an inline TOML string (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PlanwrightConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlanwrightConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Maps `PLANWRIGHT_<SECTION>_<KEY>` onto `section.key`.
///
/// Only the first underscore after a known section name becomes a dot:
/// `PLANWRIGHT_JIRA_API_TOKEN` maps to `jira.api_token`.
fn env_provider() -> Env {
    Env::prefixed("PLANWRIGHT_")
        .ignore(&["vault_key"])
        .map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
