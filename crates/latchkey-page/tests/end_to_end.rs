// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full capture-to-autofill flow over in-memory collaborators: a login page
//! produces a pending capture, the unlocked vault saves it, and the stored
//! entry fills a fresh copy of the same page.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use latchkey_config::LatchkeyConfig;
use latchkey_core::{FieldDescriptor, FieldKind, NodeId, PageDom};
use latchkey_page::{AutofillEngine, CaptureEngine};
use latchkey_test_utils::{FakePage, MemoryKv, MockMessenger};
use latchkey_vault::{CaptureMailbox, GateStatus, VaultController};

fn fast_config() -> LatchkeyConfig {
    let mut config = LatchkeyConfig::default();
    config.vault.kdf_memory_cost = 1024;
    config.vault.kdf_iterations = 1;
    config.vault.kdf_parallelism = 1;
    config.capture.settle_delay_ms = 1;
    config
}

fn login_page(username_value: &str, password_value: &str) -> (FakePage, NodeId, NodeId) {
    let page = FakePage::new("login.example");
    let form = page.add_form();
    let username = page.add_field_with_value(
        FieldDescriptor {
            kind: FieldKind::Text,
            name: Some("username".into()),
            form: Some(form),
            visible: true,
            ..Default::default()
        },
        username_value,
    );
    let password = page.add_field_with_value(
        FieldDescriptor {
            kind: FieldKind::Password,
            name: Some("password".into()),
            form: Some(form),
            visible: true,
            ..Default::default()
        },
        password_value,
    );
    (page, username, password)
}

#[tokio::test]
async fn captured_login_roundtrips_through_the_vault_into_autofill() {
    let kv = Arc::new(MemoryKv::new());
    let messenger = Arc::new(MockMessenger::new());
    let config = fast_config();

    // A user logs in on a page the capture engine is watching.
    let (page, _, _) = login_page("alice", "hunter2");
    let capture = CaptureEngine::new(
        Arc::new(page),
        CaptureMailbox::new(
            kv.clone(),
            chrono::Duration::seconds(config.capture.pending_ttl_secs as i64),
        ),
        messenger.clone(),
        Duration::from_millis(config.capture.settle_delay_ms),
    );
    let report = capture.scan(latchkey_core::Scope::Document);
    let form = report.forms[0];
    capture.handle_form_submit(form).await.unwrap();
    assert_eq!(messenger.surface_open_count().await, 1);

    // The controller sees the pending capture once the vault is set up.
    let controller = VaultController::new(kv.clone(), messenger.clone(), &config);
    assert_eq!(controller.status().await.unwrap(), GateStatus::Uninitialized);
    controller
        .setup(SecretString::from("correct horse battery staple"))
        .await
        .unwrap();

    let pending = controller.pending().await.unwrap().unwrap();
    assert_eq!(pending.domain, "login.example");
    assert_eq!(pending.username, "alice");

    let entry = controller.save_pending().await.unwrap().unwrap();
    assert_eq!(entry.domain, "login.example");
    assert!(controller.pending().await.unwrap().is_none());

    // Locking and unlocking again still shows the saved entry.
    controller.lock().await;
    controller
        .unlock(SecretString::from("correct horse battery staple"))
        .await
        .unwrap();
    let entries = controller.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].password.expose_secret(), "hunter2");

    // Autofill sends the credentials back through the messenger, and the
    // page-side engine writes them into a fresh copy of the login page.
    let response = controller.autofill(&entries[0].id).await.unwrap().unwrap();
    assert!(response.success);

    let sent = messenger.autofill_requests().await;
    assert_eq!(sent.len(), 1);

    let (fresh_page, username_node, password_node) = login_page("", "");
    let fresh_page = Arc::new(fresh_page);
    let autofill = AutofillEngine::new(fresh_page.clone());
    let page_response = autofill.respond(&sent[0]);
    assert!(page_response.success);
    assert_eq!(page_response.message, "Filled username and password fields");
    assert_eq!(
        fresh_page.read_value(username_node).as_deref(),
        Some("alice")
    );
    assert_eq!(
        fresh_page.read_value(password_node).as_deref(),
        Some("hunter2")
    );
}

#[tokio::test]
async fn wrong_master_secret_never_exposes_entries() {
    let kv = Arc::new(MemoryKv::new());
    let messenger = Arc::new(MockMessenger::new());
    let controller = VaultController::new(kv, messenger, &fast_config());

    controller
        .setup(SecretString::from("right secret"))
        .await
        .unwrap();
    controller
        .record_capture("login.example".into(), "alice".into(), "hunter2".into())
        .await
        .unwrap();
    controller.save_pending().await.unwrap().unwrap();
    controller.lock().await;

    assert!(controller
        .unlock(SecretString::from("wrong secret"))
        .await
        .is_err());
    assert!(controller.entries().await.is_err());
}
