// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crypto primitives for the Latchkey credential vault.
//!
//! Secrets are protected by a per-operation pattern: every [`encrypt`] call
//! generates a fresh random salt and nonce, derives a one-off AES-256-GCM key
//! from the master secret via Argon2id, and seals the plaintext into a
//! self-contained [`Envelope`]. Compromise of one envelope's derived key
//! therefore reveals nothing about any other envelope.
//!
//! Key derivation is deliberately expensive; both entry points run it under
//! `spawn_blocking` so interactive callers are never stalled.

pub mod aead;
pub mod envelope;
pub mod kdf;
pub mod record;

pub use envelope::Envelope;
pub use kdf::KdfParams;
pub use record::{decrypt_record, encrypt_record, CredentialRecord};

use latchkey_core::LatchkeyError;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Seal `plaintext` under `secret` into a fresh [`Envelope`].
///
/// A new random salt and nonce are generated per call, so two encryptions of
/// identical plaintext under the identical secret never produce identical
/// output.
pub async fn encrypt(
    plaintext: &[u8],
    secret: &SecretString,
    params: KdfParams,
) -> Result<Envelope, LatchkeyError> {
    let plaintext = Zeroizing::new(plaintext.to_vec());
    let secret = secret.clone();
    tokio::task::spawn_blocking(move || {
        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(secret.expose_secret().as_bytes(), &salt, &params)?;
        let (ciphertext, nonce) = aead::seal(&key, &plaintext)?;
        Ok(Envelope::from_parts(&ciphertext, &nonce, &salt))
    })
    .await
    .map_err(|e| LatchkeyError::Internal(format!("encryption task failed: {e}")))?
}

/// Open `envelope` under `secret`, re-deriving the key from the envelope's
/// own salt.
///
/// Fails closed with [`LatchkeyError::DecryptionFailed`] on any tampering,
/// wrong secret, or malformed envelope; never returns partial plaintext.
pub async fn decrypt(
    envelope: &Envelope,
    secret: &SecretString,
    params: KdfParams,
) -> Result<Zeroizing<Vec<u8>>, LatchkeyError> {
    let envelope = envelope.clone();
    let secret = secret.clone();
    tokio::task::spawn_blocking(move || {
        let salt = envelope.salt_bytes()?;
        let nonce = envelope.nonce_bytes()?;
        let ciphertext = envelope.ciphertext_bytes()?;
        let key = kdf::derive_key(secret.expose_secret().as_bytes(), &salt, &params)?;
        aead::open(&key, &nonce, &ciphertext).map(Zeroizing::new)
    })
    .await
    .map_err(|e| LatchkeyError::Internal(format!("decryption task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn roundtrip_for_printable_plaintext() {
        let secret = SecretString::from("Secret1!");
        for plaintext in ["", "a", "hello world", "påsswörd ✓ 密码"] {
            let envelope = encrypt(plaintext.as_bytes(), &secret, fast()).await.unwrap();
            let decrypted = decrypt(&envelope, &secret, fast()).await.unwrap();
            assert_eq!(&*decrypted, plaintext.as_bytes());
        }
    }

    #[tokio::test]
    async fn wrong_secret_fails_with_decryption_failed() {
        let envelope = encrypt(b"payload", &SecretString::from("S1"), fast())
            .await
            .unwrap();
        let result = decrypt(&envelope, &SecretString::from("S2"), fast()).await;
        assert!(matches!(result, Err(LatchkeyError::DecryptionFailed)));
    }

    #[tokio::test]
    async fn repeated_encryption_is_never_identical() {
        let secret = SecretString::from("Secret1!");
        let e1 = encrypt(b"same plaintext", &secret, fast()).await.unwrap();
        let e2 = encrypt(b"same plaintext", &secret, fast()).await.unwrap();

        assert_ne!(e1.ciphertext, e2.ciphertext);
        assert_ne!(e1.nonce, e2.nonce);
        assert_ne!(e1.salt, e2.salt);
    }

    #[tokio::test]
    async fn tampered_envelope_fails_closed() {
        let secret = SecretString::from("Secret1!");
        let mut envelope = encrypt(b"payload", &secret, fast()).await.unwrap();
        // Swap the salt for a fresh one; the derived key no longer matches.
        envelope.salt = Envelope::from_parts(b"", &[0u8; 12], &[3u8; 16]).salt;

        let result = decrypt(&envelope, &secret, fast()).await;
        assert!(matches!(result, Err(LatchkeyError::DecryptionFailed)));
    }
}
