// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault entry lifecycle: add, get, remove, and partial-failure tolerant load.
//!
//! Every entry is persisted under its own storage key (`entry:<uuid>`), so a
//! write to one entry can never corrupt another. Entries are encrypted with
//! the session secret through the per-operation envelope pattern; the store
//! itself holds no key material.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use latchkey_core::{entry_key, KeyValueStore, LatchkeyError, ENTRY_PREFIX};
use latchkey_crypto::{decrypt_record, encrypt_record, CredentialRecord, Envelope, KdfParams};

/// Input for creating a vault entry. Identity and timestamp are assigned by
/// the store.
#[derive(Clone)]
pub struct EntryDraft {
    pub domain: String,
    pub username: String,
    pub password: SecretString,
    pub favicon: Option<String>,
}

/// One stored credential in its in-memory, decrypted form.
#[derive(Clone)]
pub struct VaultEntry {
    /// Collision-resistant random identifier, assigned once, never reused.
    pub id: String,
    pub domain: String,
    pub username: String,
    pub password: SecretString,
    pub favicon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for VaultEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultEntry")
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// The persisted form: envelope plus plaintext metadata, one per storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: String,
    pub envelope: Envelope,
    pub favicon: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Maps entry identities to encrypted envelopes in the key-value store.
pub struct VaultStore {
    kv: Arc<dyn KeyValueStore>,
    params: KdfParams,
}

impl VaultStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, params: KdfParams) -> Self {
        Self { kv, params }
    }

    /// Encrypt `draft` under `secret` and persist it as a new entry.
    pub async fn add(
        &self,
        secret: &SecretString,
        draft: EntryDraft,
    ) -> Result<VaultEntry, LatchkeyError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let record = CredentialRecord {
            domain: draft.domain.clone(),
            username: draft.username.clone(),
            password: draft.password.expose_secret().to_string(),
        };
        let envelope = encrypt_record(&record, secret, self.params).await?;

        let stored = StoredEntry {
            id: id.clone(),
            envelope,
            favicon: draft.favicon.clone(),
            created_at,
        };
        let json = serde_json::to_string(&stored)
            .map_err(|e| LatchkeyError::Internal(format!("entry serialization failed: {e}")))?;
        self.kv.set(&entry_key(&id), json).await?;

        debug!(id = %id, domain = %draft.domain, "vault entry stored");
        Ok(VaultEntry {
            id,
            domain: draft.domain,
            username: draft.username,
            password: draft.password,
            favicon: draft.favicon,
            created_at,
        })
    }

    /// Read and decrypt a single entry, or `None` if no such id exists.
    pub async fn get(
        &self,
        secret: &SecretString,
        id: &str,
    ) -> Result<Option<VaultEntry>, LatchkeyError> {
        let Some(json) = self.kv.get(&entry_key(id)).await? else {
            return Ok(None);
        };
        let stored: StoredEntry = serde_json::from_str(&json)
            .map_err(|e| LatchkeyError::Internal(format!("corrupted entry record: {e}")))?;
        let record = decrypt_record(&stored.envelope, secret, self.params).await?;
        Ok(Some(entry_from_parts(stored, record)))
    }

    /// Delete the single storage key for `id`; other entries are untouched.
    pub async fn remove(&self, id: &str) -> Result<(), LatchkeyError> {
        self.kv.remove(&entry_key(id)).await?;
        debug!(id = %id, "vault entry removed");
        Ok(())
    }

    /// Read every stored entry, decrypting each independently.
    ///
    /// An entry that fails to parse or decrypt is logged and skipped; one bad
    /// envelope never hides the rest of the vault. Results are ordered by
    /// creation time, newest first.
    pub async fn load_all(&self, secret: &SecretString) -> Result<Vec<VaultEntry>, LatchkeyError> {
        let keys = self.kv.keys_with_prefix(ENTRY_PREFIX).await?;
        let mut entries = Vec::with_capacity(keys.len());

        for key in keys {
            // Tolerate a concurrent delete between listing and reading.
            let Some(json) = self.kv.get(&key).await? else {
                continue;
            };
            let stored: StoredEntry = match serde_json::from_str(&json) {
                Ok(stored) => stored,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping unparseable vault entry");
                    continue;
                }
            };
            match decrypt_record(&stored.envelope, secret, self.params).await {
                Ok(record) => entries.push(entry_from_parts(stored, record)),
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping undecryptable vault entry");
                }
            }
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

fn entry_from_parts(stored: StoredEntry, record: CredentialRecord) -> VaultEntry {
    VaultEntry {
        id: stored.id,
        domain: record.domain.clone(),
        username: record.username.clone(),
        password: SecretString::from(record.password.clone()),
        favicon: stored.favicon,
        created_at: stored.created_at,
    }
}
