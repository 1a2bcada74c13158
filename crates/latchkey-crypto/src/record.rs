// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured credential records and their transport form.
//!
//! A [`CredentialRecord`] is serialized to JSON before sealing and parsed
//! back after opening, matching the stored envelope layout on the wire.

use latchkey_core::LatchkeyError;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::kdf::KdfParams;
use crate::Envelope;

/// The plaintext triple protected by a vault entry's envelope.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub domain: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Serialize `record` to its transport form and seal it under `secret`.
pub async fn encrypt_record(
    record: &CredentialRecord,
    secret: &SecretString,
    params: KdfParams,
) -> Result<Envelope, LatchkeyError> {
    let json = Zeroizing::new(
        serde_json::to_vec(record)
            .map_err(|e| LatchkeyError::Internal(format!("record serialization failed: {e}")))?,
    );
    crate::encrypt(&json, secret, params).await
}

/// Open `envelope` under `secret` and parse the transport form back into a
/// [`CredentialRecord`]. Unparseable plaintext fails closed.
pub async fn decrypt_record(
    envelope: &Envelope,
    secret: &SecretString,
    params: KdfParams,
) -> Result<CredentialRecord, LatchkeyError> {
    let plaintext = crate::decrypt(envelope, secret, params).await?;
    serde_json::from_slice(&plaintext).map_err(|_| LatchkeyError::DecryptionFailed)
}
