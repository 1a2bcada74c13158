// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The self-contained encrypted-data record.
//!
//! An [`Envelope`] carries everything needed to attempt a decryption except
//! the master secret: the ciphertext (with GCM tag), the 12-byte nonce, and
//! the 16-byte Argon2id salt, each base64-encoded for storage.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use latchkey_core::LatchkeyError;
use serde::{Deserialize, Serialize};

/// Three-part encrypted record: `{ ciphertext, nonce, salt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub ciphertext: String,
    pub nonce: String,
    pub salt: String,
}

impl Envelope {
    /// Encode raw seal output into a storable envelope.
    pub fn from_parts(ciphertext: &[u8], nonce: &[u8; 12], salt: &[u8; 16]) -> Self {
        Self {
            ciphertext: BASE64.encode(ciphertext),
            nonce: BASE64.encode(nonce),
            salt: BASE64.encode(salt),
        }
    }

    /// Decoded ciphertext bytes. A malformed envelope fails closed.
    pub fn ciphertext_bytes(&self) -> Result<Vec<u8>, LatchkeyError> {
        BASE64
            .decode(&self.ciphertext)
            .map_err(|_| LatchkeyError::DecryptionFailed)
    }

    /// Decoded 12-byte nonce. A malformed envelope fails closed.
    pub fn nonce_bytes(&self) -> Result<[u8; 12], LatchkeyError> {
        let bytes = BASE64
            .decode(&self.nonce)
            .map_err(|_| LatchkeyError::DecryptionFailed)?;
        bytes.try_into().map_err(|_| LatchkeyError::DecryptionFailed)
    }

    /// Decoded 16-byte salt. A malformed envelope fails closed.
    pub fn salt_bytes(&self) -> Result<[u8; 16], LatchkeyError> {
        let bytes = BASE64
            .decode(&self.salt)
            .map_err(|_| LatchkeyError::DecryptionFailed)?;
        bytes.try_into().map_err(|_| LatchkeyError::DecryptionFailed)
    }
}
