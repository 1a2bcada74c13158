// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent key-value store trait (the storage collaborator).
//!
//! The core treats storage keys under a prefix convention: one reserved key
//! for the verifier, one for the pending-capture mailbox, and one key per
//! stored entry under the `entry:` namespace. Values are opaque strings
//! (JSON-encoded by the callers).

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::LatchkeyError;
use crate::types::KeyChange;

/// Opaque get/set/remove/watch persistence service.
///
/// Mutations are per-key; concurrent writes to *different* keys must not
/// corrupt each other. No transactional guarantee is offered across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, LatchkeyError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), LatchkeyError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), LatchkeyError>;

    /// Returns every key starting with `prefix`, in unspecified order.
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LatchkeyError>;

    /// Subscribes to change notifications, fired on any key mutation.
    fn watch(&self) -> broadcast::Receiver<KeyChange>;
}
