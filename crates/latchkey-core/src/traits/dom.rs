// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abstract DOM boundary for the inspected page.
//!
//! The page DOM is an external, untrusted, mutable graph. Engines only ever
//! read form/input structure and write input values through this trait; they
//! never assume ownership of any node. Keeping the boundary abstract makes
//! the classification rule engine unit-testable without a real document.

use crate::error::LatchkeyError;
use crate::types::{ControlDescriptor, FieldHandle, FormId, NodeId, Scope};

/// Read/write access to the host page, scoped to what capture and autofill
/// need.
pub trait PageDom: Send + Sync {
    /// Hostname of the document's location.
    fn hostname(&self) -> String;

    /// All form elements currently in the document.
    fn forms(&self) -> Vec<FormId>;

    /// Input fields within `scope`, in document order, with snapshotted
    /// identifying attributes.
    fn fields(&self, scope: Scope) -> Vec<FieldHandle>;

    /// Clickable controls (buttons and input buttons) within `scope`, in
    /// document order.
    fn controls(&self, scope: Scope) -> Vec<ControlDescriptor>;

    /// Current value of an input, or `None` if the node is gone.
    fn read_value(&self, node: NodeId) -> Option<String>;

    /// Assigns `value` to the input and notifies the page.
    ///
    /// Implementations must assign through the native input-value setter
    /// (bypassing any property interception the host page installed) and then
    /// dispatch the event sequence a reactive framework expects: input,
    /// change, keydown, keyup. A plain property assignment is frequently
    /// invisible to framework change detection.
    fn write_value_and_notify(&self, node: NodeId, value: &str) -> Result<(), LatchkeyError>;
}
