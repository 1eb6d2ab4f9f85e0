// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-level encryption for the settings store.
//!
//! A single random 256-bit master key encrypts every secret setting with
//! AES-256-GCM. The key comes from `PLANWRIGHT_VAULT_KEY` (64 hex chars) or
//! from a key file created on first start.

pub mod cipher;
pub mod crypto;
pub mod key;

pub use cipher::FieldCipher;
pub use key::{VAULT_KEY_ENV, load_or_create_key};

/// Masks a secret for display: `sk-a...wxyz`.
///
/// Short values (< 10 chars) are fully masked as `****`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
