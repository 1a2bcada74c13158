// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across collaborator traits and the Latchkey workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::LatchkeyError;

/// Semantic role a page input can be classified as.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Username,
    Password,
}

/// The declared input type of a page field, as far as classification cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Other,
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::Other
    }
}

/// Opaque handle to a DOM node owned by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Opaque handle to a form element owned by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormId(pub u64);

/// Where a classification pass searches: a single form, or the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    Form(FormId),
}

/// Identifying attributes of an input element, snapshotted by the DOM binding.
///
/// Values are read separately via [`crate::traits::dom::PageDom::read_value`]
/// because they can change between attachment and submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub name: Option<String>,
    pub id: Option<String>,
    pub placeholder: Option<String>,
    pub autocomplete: Option<String>,
    /// The containing form, if any.
    pub form: Option<FormId>,
    /// Computed visibility; hidden fields are never classified.
    pub visible: bool,
}

/// A page input together with its snapshotted attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    pub node: NodeId,
    pub descriptor: FieldDescriptor,
}

/// The element kind of a clickable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    Input,
}

/// Identifying attributes of a clickable control, used to recognize
/// submit-like buttons outside any form submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub node: NodeId,
    pub kind: ControlKind,
    pub type_attr: Option<String>,
    pub id: Option<String>,
    pub class: Option<String>,
}

/// A change notification from the persistent key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChange {
    pub key: String,
}

/// A just-observed credential pair awaiting user confirmation.
///
/// At most one instance is live at a time; a newer capture silently replaces
/// an older one. The record is persisted briefly by necessity of cross-process
/// handoff and must be purged promptly (see the mailbox validity window).
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct PendingCapture {
    pub domain: String,
    pub username: String,
    pub password: String,
    #[zeroize(skip)]
    pub timestamp: DateTime<Utc>,
}

impl PendingCapture {
    /// Fails with [`LatchkeyError::CaptureExpired`] if this capture is older
    /// than `ttl`. The mailbox converts that into a silent purge.
    pub fn ensure_fresh(&self, ttl: chrono::Duration) -> Result<(), LatchkeyError> {
        if Utc::now() - self.timestamp > ttl {
            Err(LatchkeyError::CaptureExpired)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for PendingCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCapture")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Payload of an autofill request sent from the controller to a page.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutofillRequest {
    pub domain: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AutofillRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutofillRequest")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response to an autofill request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutofillResponse {
    pub success: bool,
    pub message: String,
}

/// Wire form of the one-shot requests carried by the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageMessage {
    OpenInteractiveSurface,
    Autofill(AutofillRequest),
}
