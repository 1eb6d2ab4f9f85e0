// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master key resolution.

use std::path::Path;

use planwright_core::PlanError;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto;

/// Environment variable holding a hex-encoded master key.
pub const VAULT_KEY_ENV: &str = "PLANWRIGHT_VAULT_KEY";

/// Resolves the master key: env var first, then `key_file`, creating the
/// file with a fresh random key when neither exists.
pub fn load_or_create_key(key_file: &Path) -> Result<[u8; 32], PlanError> {
    if let Ok(value) = std::env::var(VAULT_KEY_ENV) {
        return parse_key(value.trim()).map_err(|e| {
            PlanError::Vault(format!("{VAULT_KEY_ENV} is invalid: {e}"))
        });
    }

    match std::fs::read_to_string(key_file) {
        Ok(contents) => parse_key(contents.trim()).map_err(|e| {
            PlanError::Vault(format!("key file {} is invalid: {e}", key_file.display()))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => create_key_file(key_file),
        Err(e) => Err(PlanError::Vault(format!(
            "cannot read key file {}: {e}",
            key_file.display()
        ))),
    }
}

fn parse_key(hex_key: &str) -> Result<[u8; 32], String> {
    let bytes = Zeroizing::new(hex::decode(hex_key).map_err(|e| e.to_string())?);
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}

fn create_key_file(key_file: &Path) -> Result<[u8; 32], PlanError> {
    let key = crypto::generate_random_key()?;
    if let Some(parent) = key_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PlanError::Vault(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    let encoded = Zeroizing::new(hex::encode(key));
    std::fs::write(key_file, encoded.as_bytes()).map_err(|e| {
        PlanError::Vault(format!("cannot write key file {}: {e}", key_file.display()))
    })?;
    restrict_permissions(key_file);
    info!(path = %key_file.display(), "generated new vault key");
    Ok(key)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), error = %e, "could not restrict vault key permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn creates_then_reuses_key_file() {
        unsafe { std::env::remove_var(VAULT_KEY_ENV) };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vault.key");

        let first = load_or_create_key(&path).unwrap();
        assert!(path.exists());
        let second = load_or_create_key(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    #[serial]
    fn env_var_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.key");
        unsafe { std::env::set_var(VAULT_KEY_ENV, "11".repeat(32)) };
        let key = load_or_create_key(&path);
        unsafe { std::env::remove_var(VAULT_KEY_ENV) };

        assert_eq!(key.unwrap(), [0x11u8; 32]);
        assert!(!path.exists());
    }

    #[test]
    #[serial]
    fn rejects_short_key_file() {
        unsafe { std::env::remove_var(VAULT_KEY_ENV) };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.key");
        std::fs::write(&path, "abcd").unwrap();
        let err = load_or_create_key(&path).unwrap_err();
        assert!(err.to_string().contains("expected 32 bytes"));
    }
}
