// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Latchkey credential vault.

use thiserror::Error;

use crate::types::FieldRole;

/// The primary error type used across all Latchkey collaborator traits and
/// core operations.
#[derive(Debug, Error)]
pub enum LatchkeyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Authenticated decryption rejected the input. Covers a wrong master
    /// secret, a tampered ciphertext, and a malformed envelope alike; no
    /// partial plaintext is ever produced.
    #[error("decryption failed: wrong master secret or corrupted data")]
    DecryptionFailed,

    /// An unlock attempt was rejected. The message is deliberately identical
    /// whether the secret was wrong or the stored verifier was unreadable.
    #[error("authentication failed: could not verify master secret")]
    AuthenticationFailed,

    /// An operation that needs the session secret ran while locked.
    #[error("vault is locked")]
    Locked,

    /// Setup was attempted on a vault that already has a verifier.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// Capture or autofill could not locate a required field on the page.
    #[error("no usable {role} field on the page")]
    FieldNotFound { role: FieldRole },

    /// A pending capture aged out before it was consumed. Internal to the
    /// mailbox; never surfaced to the user.
    #[error("pending capture expired before it was consumed")]
    CaptureExpired,

    /// Persistent key-value store read failure.
    #[error("storage read failed: {source}")]
    StorageRead {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persistent key-value store write failure.
    #[error("storage write failed: {source}")]
    StorageWrite {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel failure (request could not be delivered or answered).
    #[error("messaging error: {message}")]
    Messaging {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cryptographic primitive failure other than rejected decryption
    /// (key setup, CSPRNG, invalid KDF parameters).
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
