// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pending-capture mailbox: a bounded inbox of capacity one.
//!
//! The capture engine and the vault controller share no memory; this mailbox
//! is their only meeting point, a single reserved storage key with
//! overwrite-on-push and expiry-on-read semantics. Enforcing both here keeps
//! the validity window auditable in one place.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use latchkey_core::{KeyChange, KeyValueStore, LatchkeyError, PendingCapture, PENDING_KEY};

/// Cross-process handoff slot for a just-observed credential pair.
pub struct CaptureMailbox {
    kv: Arc<dyn KeyValueStore>,
    ttl: chrono::Duration,
}

impl CaptureMailbox {
    pub fn new(kv: Arc<dyn KeyValueStore>, ttl: chrono::Duration) -> Self {
        Self { kv, ttl }
    }

    /// Deposit a capture, silently replacing any unconsumed older one.
    pub async fn push(&self, capture: &PendingCapture) -> Result<(), LatchkeyError> {
        let json = serde_json::to_string(capture)
            .map_err(|e| LatchkeyError::Internal(format!("capture serialization failed: {e}")))?;
        self.kv.set(PENDING_KEY, json).await?;
        debug!(domain = %capture.domain, "pending capture deposited");
        Ok(())
    }

    /// Read the slot without consuming it.
    ///
    /// An expired or unparseable record is purged and reported as absent; a
    /// stale capture must never be surfaced to the user.
    pub async fn peek(&self) -> Result<Option<PendingCapture>, LatchkeyError> {
        let Some(json) = self.kv.get(PENDING_KEY).await? else {
            return Ok(None);
        };

        let capture: PendingCapture = match serde_json::from_str(&json) {
            Ok(capture) => capture,
            Err(e) => {
                warn!(error = %e, "purging unparseable pending capture");
                self.kv.remove(PENDING_KEY).await?;
                return Ok(None);
            }
        };

        match capture.ensure_fresh(self.ttl) {
            Ok(()) => Ok(Some(capture)),
            Err(LatchkeyError::CaptureExpired) => {
                debug!("pending capture aged out; purging");
                self.kv.remove(PENDING_KEY).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Consume the slot: read, then clear if a fresh capture was present.
    pub async fn take(&self) -> Result<Option<PendingCapture>, LatchkeyError> {
        let capture = self.peek().await?;
        if capture.is_some() {
            self.kv.remove(PENDING_KEY).await?;
        }
        Ok(capture)
    }

    /// Explicitly discard whatever is in the slot.
    pub async fn dismiss(&self) -> Result<(), LatchkeyError> {
        self.kv.remove(PENDING_KEY).await?;
        debug!("pending capture dismissed");
        Ok(())
    }

    /// Change notifications from the underlying store. A deposit fires a
    /// change for [`PENDING_KEY`]; receivers filter on the key.
    pub fn watch(&self) -> broadcast::Receiver<KeyChange> {
        self.kv.watch()
    }
}
