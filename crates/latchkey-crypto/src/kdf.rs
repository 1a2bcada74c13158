// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from the master secret.
//!
//! Derives a 32-byte key using Argon2id (Algorithm::Argon2id, Version::V0x13).
//! The production parameters are fixed (OWASP client-side recommendations);
//! [`KdfParams`] exists so tests can lower the cost.
//!
//! Derivation takes tens to hundreds of milliseconds at production cost and
//! must never run on an interactive path; the envelope-level entry points in
//! this crate move it onto a blocking thread.

use latchkey_core::LatchkeyError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Argon2id cost parameters.
///
/// Defaults are the fixed production values: 2 iterations, 16 MiB memory,
/// single lane, 32-byte output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 16 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Derive a 32-byte key from the master secret using Argon2id.
///
/// Deterministic for a given (secret, salt) pair. The returned key is wrapped
/// in [`Zeroizing`] for automatic memory zeroing on drop.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8; 16],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>, LatchkeyError> {
    let argon_params =
        argon2::Params::new(params.memory_cost, params.iterations, params.parallelism, Some(32))
            .map_err(|e| LatchkeyError::Crypto(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 =
        argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, argon_params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(secret, salt, output.as_mut())
        .map_err(|e| LatchkeyError::Crypto(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Generate a random 16-byte salt for Argon2id.
pub fn generate_salt() -> Result<[u8; 16], LatchkeyError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| LatchkeyError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}
