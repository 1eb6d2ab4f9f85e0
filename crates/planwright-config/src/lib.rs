// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Planwright.
//!
//! TOML files in the XDG hierarchy are merged with `PLANWRIGHT_*` environment
//! overrides, checked with `deny_unknown_fields`, validated, and any failure
//! is reported as miette diagnostics with typo suggestions.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PlanwrightConfig;

/// Loads the standard hierarchy and validates the result.
pub fn load_and_validate() -> Result<PlanwrightConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads one explicit file (plus env overrides) and validates the result.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<PlanwrightConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources(std::iter::once(path.to_path_buf()))
    })
}

/// Loads an inline TOML string and validates the result.
pub fn load_and_validate_str(toml_content: &str) -> Result<PlanwrightConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<PlanwrightConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<PlanwrightConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Reads every config file that exists, for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    read_sources(loader::config_file_paths().into_iter().map(|p| {
        if p.is_relative() {
            std::env::current_dir().map(|d| d.join(&p)).unwrap_or(p)
        } else {
            p
        }
    }))
}

fn read_sources(paths: impl Iterator<Item = std::path::PathBuf>) -> Vec<(String, String)> {
    paths
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
