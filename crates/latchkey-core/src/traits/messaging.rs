// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot request/response messaging channel trait.
//!
//! Carries exactly two requests between the vault controller and a page
//! context; the wire form is [`crate::types::PageMessage`].

use async_trait::async_trait;

use crate::error::LatchkeyError;
use crate::types::{AutofillRequest, AutofillResponse};

/// Cross-process request/response channel.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Asks the controller side to bring up its interactive surface.
    ///
    /// Callers on the capture path treat a failure here as non-fatal: the
    /// mailbox entry, not this signal, is the source of truth.
    async fn open_interactive_surface(&self) -> Result<(), LatchkeyError>;

    /// Sends credentials to the active page for injection and returns the
    /// page's fill report.
    async fn autofill(&self, request: AutofillRequest)
        -> Result<AutofillResponse, LatchkeyError>;
}
