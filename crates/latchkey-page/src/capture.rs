// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential-capture engine.
//!
//! Watches login attempts from the page side: form submissions and clicks on
//! submit-like controls. A successful classification deposits a
//! [`PendingCapture`] in the mailbox and nudges the controller to surface a
//! save prompt. Capture never blocks or alters the page's own submission.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use latchkey_core::{
    FieldRole, FormId, LatchkeyError, Messenger, NodeId, PageDom, PendingCapture, Scope,
};
use latchkey_vault::CaptureMailbox;

use crate::rules::{is_submit_like, locate};

/// Capture triggers discovered in a scan: forms to watch for submission, and
/// submit-like controls to watch for clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub forms: Vec<FormId>,
    pub submit_controls: Vec<NodeId>,
}

/// Observes login attempts and deposits captures in the mailbox.
pub struct CaptureEngine {
    dom: Arc<dyn PageDom>,
    mailbox: CaptureMailbox,
    messenger: Arc<dyn Messenger>,
    settle_delay: Duration,
}

impl CaptureEngine {
    pub fn new(
        dom: Arc<dyn PageDom>,
        mailbox: CaptureMailbox,
        messenger: Arc<dyn Messenger>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            dom,
            mailbox,
            messenger,
            settle_delay,
        }
    }

    /// Find the triggers to install in `scope`. Called once for the initial
    /// document and again for every dynamically inserted subtree.
    pub fn scan(&self, scope: Scope) -> ScanReport {
        let forms = match scope {
            Scope::Document => self.dom.forms(),
            Scope::Form(form) => vec![form],
        };
        let submit_controls = self
            .dom
            .controls(scope)
            .into_iter()
            .filter(is_submit_like)
            .map(|c| c.node)
            .collect();
        ScanReport {
            forms,
            submit_controls,
        }
    }

    /// A form is being submitted: classify within that form, requiring both
    /// fields to already hold values.
    pub async fn handle_form_submit(&self, form: FormId) -> Result<(), LatchkeyError> {
        let scope = Scope::Form(form);
        let username = locate(self.dom.as_ref(), scope, FieldRole::Username, true);
        let password = locate(self.dom.as_ref(), scope, FieldRole::Password, true);

        let (Some(username), Some(password)) = (username, password) else {
            debug!(?form, "form submit without a classifiable credential pair");
            return Ok(());
        };
        let (Some(username), Some(password)) = (
            self.dom.read_value(username.node),
            self.dom.read_value(password.node),
        ) else {
            return Ok(());
        };
        self.record(username, password).await
    }

    /// A submit-like control was clicked. Submission often happens through
    /// script rather than a form, so wait for the page to settle, then
    /// classify document-wide.
    pub async fn handle_submit_click(&self) -> Result<(), LatchkeyError> {
        tokio::time::sleep(self.settle_delay).await;

        let username = locate(self.dom.as_ref(), Scope::Document, FieldRole::Username, false)
            .and_then(|f| self.dom.read_value(f.node))
            .filter(|v| !v.is_empty());
        let password = locate(self.dom.as_ref(), Scope::Document, FieldRole::Password, false)
            .and_then(|f| self.dom.read_value(f.node))
            .filter(|v| !v.is_empty());

        let (Some(username), Some(password)) = (username, password) else {
            warn!("could not find both username and password fields with values");
            return Ok(());
        };
        self.record(username, password).await
    }

    /// Deposit the capture and nudge the controller. Surface-open failure is
    /// non-fatal; the capture stays in the mailbox either way.
    async fn record(&self, username: String, password: String) -> Result<(), LatchkeyError> {
        let capture = PendingCapture {
            domain: self.dom.hostname(),
            username,
            password,
            timestamp: Utc::now(),
        };
        self.mailbox.push(&capture).await?;

        if let Err(e) = self.messenger.open_interactive_surface().await {
            warn!(error = %e, "could not signal the interactive surface");
        }
        Ok(())
    }
}
