// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault controller: one façade over the gate, the entry store, and the
//! pending-capture mailbox.
//!
//! Interactive surfaces talk to this type only. It enforces the lock
//! discipline (every entry operation goes through the gate's session secret)
//! and owns the promotion path from a pending capture to a stored entry.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};

use latchkey_config::LatchkeyConfig;
use latchkey_core::{
    AutofillRequest, AutofillResponse, KeyChange, KeyValueStore, LatchkeyError, Messenger,
    PendingCapture,
};
use latchkey_crypto::KdfParams;

use crate::gate::{GateStatus, MasterGate};
use crate::mailbox::CaptureMailbox;
use crate::store::{EntryDraft, VaultEntry, VaultStore};

/// Well-known favicon service; entries carry a derived icon URL so list
/// surfaces need no network logic of their own.
fn favicon_url(domain: &str) -> String {
    format!("https://www.google.com/s2/favicons?domain={domain}&sz=32")
}

/// Façade coordinating gate, store, mailbox, and page messenger.
pub struct VaultController {
    gate: MasterGate,
    store: VaultStore,
    mailbox: CaptureMailbox,
    messenger: Arc<dyn Messenger>,
}

impl VaultController {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        messenger: Arc<dyn Messenger>,
        config: &LatchkeyConfig,
    ) -> Self {
        let params = KdfParams {
            memory_cost: config.vault.kdf_memory_cost,
            iterations: config.vault.kdf_iterations,
            parallelism: config.vault.kdf_parallelism,
        };
        let ttl = chrono::Duration::seconds(config.capture.pending_ttl_secs as i64);
        Self {
            gate: MasterGate::new(kv.clone(), params),
            store: VaultStore::new(kv.clone(), params),
            mailbox: CaptureMailbox::new(kv, ttl),
            messenger,
        }
    }

    // ---- gate -------------------------------------------------------------

    pub async fn status(&self) -> Result<GateStatus, LatchkeyError> {
        self.gate.status().await
    }

    pub async fn setup(&self, secret: secrecy::SecretString) -> Result<(), LatchkeyError> {
        self.gate.setup(secret).await
    }

    pub async fn unlock(&self, secret: secrecy::SecretString) -> Result<(), LatchkeyError> {
        self.gate.unlock(secret).await
    }

    pub async fn lock(&self) {
        self.gate.lock().await;
    }

    /// Ask the host to bring up the interactive surface.
    pub async fn open_interactive_surface(&self) -> Result<(), LatchkeyError> {
        self.messenger.open_interactive_surface().await
    }

    // ---- entries ----------------------------------------------------------

    /// All stored entries, newest first. Requires an unlocked gate.
    pub async fn entries(&self) -> Result<Vec<VaultEntry>, LatchkeyError> {
        let secret = self.gate.session_secret().await?;
        self.store.load_all(&secret).await
    }

    /// Store a new entry. Requires an unlocked gate.
    pub async fn add_entry(&self, draft: EntryDraft) -> Result<VaultEntry, LatchkeyError> {
        let secret = self.gate.session_secret().await?;
        self.store.add(&secret, draft).await
    }

    /// Delete an entry by id. Deletion needs no decryption, but is still
    /// gated so a locked surface cannot mutate the vault.
    pub async fn delete_entry(&self, id: &str) -> Result<(), LatchkeyError> {
        self.gate.session_secret().await?;
        self.store.remove(id).await
    }

    // ---- pending capture --------------------------------------------------

    /// The fresh pending capture, if one is waiting.
    pub async fn pending(&self) -> Result<Option<PendingCapture>, LatchkeyError> {
        self.mailbox.peek().await
    }

    /// Promote the pending capture into a stored entry.
    ///
    /// Requires an unlocked gate; the capture is consumed only after the
    /// entry is durably stored, so a failed save leaves it available.
    pub async fn save_pending(&self) -> Result<Option<VaultEntry>, LatchkeyError> {
        let secret = self.gate.session_secret().await?;
        let Some(capture) = self.mailbox.peek().await? else {
            return Ok(None);
        };

        let draft = EntryDraft {
            domain: capture.domain.clone(),
            username: capture.username.clone(),
            password: secrecy::SecretString::from(capture.password.clone()),
            favicon: Some(favicon_url(&capture.domain)),
        };
        let entry = self.store.add(&secret, draft).await?;
        self.mailbox.dismiss().await?;

        info!(domain = %entry.domain, "pending capture saved to vault");
        Ok(Some(entry))
    }

    /// Discard the pending capture without saving it.
    pub async fn dismiss_pending(&self) -> Result<(), LatchkeyError> {
        self.mailbox.dismiss().await
    }

    /// Storage change notifications, for surfaces that refresh on writes.
    pub fn watch(&self) -> broadcast::Receiver<KeyChange> {
        self.mailbox.watch()
    }

    // ---- autofill ---------------------------------------------------------

    /// Send entry `id`'s credentials to the active page for filling.
    ///
    /// Returns `Ok(None)` when no entry has that id; the page outcome,
    /// including partial fills, comes back in the [`AutofillResponse`].
    pub async fn autofill(&self, id: &str) -> Result<Option<AutofillResponse>, LatchkeyError> {
        let secret = self.gate.session_secret().await?;
        let Some(entry) = self.store.get(&secret, id).await? else {
            return Ok(None);
        };

        let request = AutofillRequest {
            domain: entry.domain.clone(),
            username: entry.username.clone(),
            password: secrecy::ExposeSecret::expose_secret(&entry.password).to_string(),
        };
        debug!(domain = %request.domain, "dispatching autofill request");
        let response = self.messenger.autofill(request).await?;
        Ok(Some(response))
    }

    /// Record a capture observed on a page, as the capture engine would.
    pub async fn record_capture(
        &self,
        domain: String,
        username: String,
        password: String,
    ) -> Result<(), LatchkeyError> {
        let capture = PendingCapture {
            domain,
            username,
            password,
            timestamp: Utc::now(),
        };
        self.mailbox.push(&capture).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_test_utils::{MemoryKv, MockMessenger};
    use secrecy::{ExposeSecret, SecretString};

    fn fast_config() -> LatchkeyConfig {
        let mut config = LatchkeyConfig::default();
        config.vault.kdf_memory_cost = 1024;
        config.vault.kdf_iterations = 1;
        config.vault.kdf_parallelism = 1;
        config
    }

    fn controller() -> (VaultController, Arc<MockMessenger>) {
        let messenger = Arc::new(MockMessenger::new());
        let controller = VaultController::new(
            Arc::new(MemoryKv::new()),
            messenger.clone(),
            &fast_config(),
        );
        (controller, messenger)
    }

    fn draft(domain: &str, username: &str) -> EntryDraft {
        EntryDraft {
            domain: domain.into(),
            username: username.into(),
            password: SecretString::from("hunter2"),
            favicon: None,
        }
    }

    #[tokio::test]
    async fn entry_operations_require_an_unlocked_gate() {
        let (controller, _) = controller();

        assert!(matches!(
            controller.entries().await,
            Err(LatchkeyError::Locked)
        ));
        assert!(matches!(
            controller.add_entry(draft("example.com", "alice")).await,
            Err(LatchkeyError::Locked)
        ));
        assert!(matches!(
            controller.delete_entry("some-id").await,
            Err(LatchkeyError::Locked)
        ));
    }

    #[tokio::test]
    async fn save_pending_promotes_the_capture_to_an_entry() {
        let (controller, _) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();
        controller
            .record_capture("example.com".into(), "alice".into(), "hunter2".into())
            .await
            .unwrap();

        let entry = controller.save_pending().await.unwrap().unwrap();
        assert_eq!(entry.domain, "example.com");
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.password.expose_secret(), "hunter2");
        assert!(entry
            .favicon
            .as_deref()
            .unwrap()
            .contains("domain=example.com"));

        // The capture is consumed by the save.
        assert!(controller.pending().await.unwrap().is_none());
        assert_eq!(controller.entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_pending_with_empty_mailbox_returns_none() {
        let (controller, _) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();
        assert!(controller.save_pending().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_pending_while_locked_leaves_the_capture_intact() {
        let (controller, _) = controller();
        controller
            .record_capture("example.com".into(), "alice".into(), "hunter2".into())
            .await
            .unwrap();

        assert!(matches!(
            controller.save_pending().await,
            Err(LatchkeyError::Locked)
        ));
        assert!(controller.pending().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn autofill_forwards_credentials_to_the_messenger() {
        let (controller, messenger) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();
        let entry = controller
            .add_entry(draft("example.com", "alice"))
            .await
            .unwrap();

        let response = controller.autofill(&entry.id).await.unwrap().unwrap();
        assert!(response.success);

        let sent = messenger.autofill_requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].username, "alice");
        assert_eq!(sent[0].password, "hunter2");
    }

    #[tokio::test]
    async fn open_interactive_surface_reaches_the_messenger() {
        let (controller, messenger) = controller();
        controller.open_interactive_surface().await.unwrap();
        assert_eq!(messenger.surface_open_count().await, 1);
    }

    #[tokio::test]
    async fn autofill_transport_failure_propagates() {
        let (controller, messenger) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();
        let entry = controller
            .add_entry(draft("example.com", "alice"))
            .await
            .unwrap();

        messenger.fail_autofill().await;
        let result = controller.autofill(&entry.id).await;
        assert!(matches!(result, Err(LatchkeyError::Messaging { .. })));
    }

    #[tokio::test]
    async fn autofill_with_unknown_id_returns_none() {
        let (controller, messenger) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();

        assert!(controller.autofill("no-such-id").await.unwrap().is_none());
        assert!(messenger.autofill_requests().await.is_empty());
    }

    #[tokio::test]
    async fn lock_blocks_further_entry_access() {
        let (controller, _) = controller();
        controller.setup(SecretString::from("master")).await.unwrap();
        controller
            .add_entry(draft("example.com", "alice"))
            .await
            .unwrap();

        controller.lock().await;
        assert!(matches!(
            controller.entries().await,
            Err(LatchkeyError::Locked)
        ));

        controller.unlock(SecretString::from("master")).await.unwrap();
        assert_eq!(controller.entries().await.unwrap().len(), 1);
    }
}
