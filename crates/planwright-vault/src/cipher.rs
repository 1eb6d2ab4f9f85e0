// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String-in, string-out encryption for settings values.

use planwright_core::PlanError;
use ring::aead::NONCE_LEN;
use zeroize::Zeroizing;

use crate::crypto;

/// Encrypts settings values with the master key. Stored form is hex of
/// `nonce || ciphertext_with_tag`.
#[derive(Clone)]
pub struct FieldCipher {
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl FieldCipher {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, PlanError> {
        let (ciphertext, nonce) = crypto::seal(&self.key, plaintext.as_bytes())?;
        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(hex::encode(blob))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, PlanError> {
        let blob = hex::decode(stored)
            .map_err(|e| PlanError::Vault(format!("stored value is not valid hex: {e}")))?;
        if blob.len() <= NONCE_LEN {
            return Err(PlanError::Vault("stored value is truncated".to_string()));
        }
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| PlanError::Vault("stored value has a malformed nonce".to_string()))?;
        let plaintext = Zeroizing::new(crypto::open(&self.key, &nonce, ciphertext)?);
        String::from_utf8(plaintext.to_vec())
            .map_err(|_| PlanError::Vault("decrypted value is not UTF-8".to_string()))
    }
}
