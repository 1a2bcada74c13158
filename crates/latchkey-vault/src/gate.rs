// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-secret gate: the setup/unlock state machine.
//!
//! The master secret is never persisted. Setup encrypts a fixed known token
//! into a verifier envelope; unlock proves a candidate secret by decrypting
//! it. While unlocked, the secret lives only in this struct and is zeroed on
//! drop. There is deliberately no recovery path for a forgotten secret: no
//! backdoor, no weaker fallback verifier.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, info};

use latchkey_core::{KeyValueStore, LatchkeyError, VERIFIER_KEY};
use latchkey_crypto::{Envelope, KdfParams};

/// The fixed plaintext the verifier envelope encrypts. Its value carries no
/// secret; only the ability to decrypt it matters.
const VERIFIER_TOKEN: &[u8] = b"latchkey-verification-token";

/// Observable gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// No verifier persisted yet; the vault awaits first-time setup.
    Uninitialized,
    /// A verifier exists but no session secret is cached.
    Locked,
    /// A session secret is cached and entries can be decrypted.
    Unlocked,
}

/// Setup/unlock state machine owning the session master secret.
pub struct MasterGate {
    kv: Arc<dyn KeyValueStore>,
    params: KdfParams,
    secret: Mutex<Option<SecretString>>,
}

impl std::fmt::Debug for MasterGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterGate")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl MasterGate {
    pub fn new(kv: Arc<dyn KeyValueStore>, params: KdfParams) -> Self {
        Self {
            kv,
            params,
            secret: Mutex::new(None),
        }
    }

    /// Current gate state, derived from verifier presence and the cached secret.
    pub async fn status(&self) -> Result<GateStatus, LatchkeyError> {
        if self.secret.lock().await.is_some() {
            return Ok(GateStatus::Unlocked);
        }
        match self.kv.get(VERIFIER_KEY).await? {
            Some(_) => Ok(GateStatus::Locked),
            None => Ok(GateStatus::Uninitialized),
        }
    }

    /// First-time setup: persist a verifier for `secret` and unlock.
    ///
    /// Refuses to overwrite an existing verifier; that would orphan every
    /// entry encrypted under the old secret.
    pub async fn setup(&self, secret: SecretString) -> Result<(), LatchkeyError> {
        if self.kv.get(VERIFIER_KEY).await?.is_some() {
            return Err(LatchkeyError::AlreadyInitialized);
        }

        let verifier = latchkey_crypto::encrypt(VERIFIER_TOKEN, &secret, self.params).await?;
        let json = serde_json::to_string(&verifier)
            .map_err(|e| LatchkeyError::Internal(format!("verifier serialization failed: {e}")))?;
        self.kv.set(VERIFIER_KEY, json).await?;

        *self.secret.lock().await = Some(secret);
        info!("vault initialized and unlocked");
        Ok(())
    }

    /// Attempt to unlock with a candidate secret.
    ///
    /// A missing verifier, an unparseable verifier, and a wrong secret all
    /// produce the same [`LatchkeyError::AuthenticationFailed`], so the
    /// caller learns nothing about storage integrity from a rejection.
    pub async fn unlock(&self, secret: SecretString) -> Result<(), LatchkeyError> {
        let Some(json) = self.kv.get(VERIFIER_KEY).await? else {
            debug!("unlock attempted with no verifier persisted");
            return Err(LatchkeyError::AuthenticationFailed);
        };

        let envelope: Envelope = match serde_json::from_str(&json) {
            Ok(envelope) => envelope,
            Err(_) => {
                debug!("verifier record is unparseable");
                return Err(LatchkeyError::AuthenticationFailed);
            }
        };

        match latchkey_crypto::decrypt(&envelope, &secret, self.params).await {
            Ok(plaintext) if plaintext.as_slice() == VERIFIER_TOKEN => {
                *self.secret.lock().await = Some(secret);
                info!("vault unlocked");
                Ok(())
            }
            Ok(_) | Err(LatchkeyError::DecryptionFailed) => {
                Err(LatchkeyError::AuthenticationFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Clear the cached session secret. The secret's memory is zeroed on drop.
    pub async fn lock(&self) {
        *self.secret.lock().await = None;
        info!("vault locked");
    }

    /// The cached session secret, or [`LatchkeyError::Locked`].
    pub async fn session_secret(&self) -> Result<SecretString, LatchkeyError> {
        self.secret
            .lock()
            .await
            .clone()
            .ok_or(LatchkeyError::Locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_test_utils::MemoryKv;

    fn fast() -> KdfParams {
        KdfParams {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn gate() -> MasterGate {
        MasterGate::new(Arc::new(MemoryKv::new()), fast())
    }

    #[tokio::test]
    async fn setup_then_unlock_with_same_secret() {
        let gate = gate();
        assert_eq!(gate.status().await.unwrap(), GateStatus::Uninitialized);

        gate.setup(SecretString::from("Secret1!")).await.unwrap();
        assert_eq!(gate.status().await.unwrap(), GateStatus::Unlocked);

        gate.lock().await;
        assert_eq!(gate.status().await.unwrap(), GateStatus::Locked);

        gate.unlock(SecretString::from("Secret1!")).await.unwrap();
        assert_eq!(gate.status().await.unwrap(), GateStatus::Unlocked);
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected_and_stays_locked() {
        let gate = gate();
        gate.setup(SecretString::from("Secret1!")).await.unwrap();
        gate.lock().await;

        let result = gate.unlock(SecretString::from("WrongSecret")).await;
        assert!(matches!(result, Err(LatchkeyError::AuthenticationFailed)));
        assert_eq!(gate.status().await.unwrap(), GateStatus::Locked);
    }

    #[tokio::test]
    async fn unlock_without_verifier_reports_authentication_failed() {
        let gate = gate();
        let result = gate.unlock(SecretString::from("anything")).await;
        assert!(matches!(result, Err(LatchkeyError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn corrupted_verifier_reports_the_same_authentication_error() {
        let kv = Arc::new(MemoryKv::new());
        kv.set(VERIFIER_KEY, "not an envelope".to_string())
            .await
            .unwrap();
        let gate = MasterGate::new(kv, fast());

        let result = gate.unlock(SecretString::from("Secret1!")).await;
        assert!(matches!(result, Err(LatchkeyError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn setup_twice_is_refused() {
        let gate = gate();
        gate.setup(SecretString::from("first")).await.unwrap();

        let result = gate.setup(SecretString::from("second")).await;
        assert!(matches!(result, Err(LatchkeyError::AlreadyInitialized)));
    }

    #[tokio::test]
    async fn failed_verifier_write_aborts_setup() {
        let kv = Arc::new(MemoryKv::new());
        let gate = MasterGate::new(kv.clone(), fast());

        kv.fail_writes(true).await;
        let result = gate.setup(SecretString::from("Secret1!")).await;
        assert!(matches!(result, Err(LatchkeyError::StorageWrite { .. })));

        // Nothing was persisted and no secret was cached.
        kv.fail_writes(false).await;
        assert_eq!(gate.status().await.unwrap(), GateStatus::Uninitialized);
        assert!(matches!(
            gate.session_secret().await,
            Err(LatchkeyError::Locked)
        ));
    }

    #[tokio::test]
    async fn session_secret_requires_unlock() {
        let gate = gate();
        assert!(matches!(
            gate.session_secret().await,
            Err(LatchkeyError::Locked)
        ));

        gate.setup(SecretString::from("Secret1!")).await.unwrap();
        let secret = gate.session_secret().await.unwrap();
        assert_eq!(secret.expose_secret(), "Secret1!");

        gate.lock().await;
        assert!(matches!(
            gate.session_secret().await,
            Err(LatchkeyError::Locked)
        ));
    }
}
