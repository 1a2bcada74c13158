// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Latchkey credential vault.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Latchkey workspace. The crypto, vault,
//! page-engine, and storage crates all build on what is defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LatchkeyError;
pub use types::{
    AutofillRequest, AutofillResponse, ControlDescriptor, ControlKind, FieldDescriptor,
    FieldHandle, FieldKind, FieldRole, FormId, KeyChange, NodeId, PageMessage, PendingCapture,
    Scope,
};

// Re-export all collaborator traits at crate root.
pub use traits::{KeyValueStore, Messenger, PageDom};

/// Reserved storage key holding the master-secret verifier envelope.
pub const VERIFIER_KEY: &str = "_verifier";

/// Reserved storage key holding the pending-capture mailbox slot.
pub const PENDING_KEY: &str = "_pending";

/// Namespace prefix for per-entry storage keys.
pub const ENTRY_PREFIX: &str = "entry:";

/// Storage key for the entry with the given id.
pub fn entry_key(id: &str) -> String {
    format!("{ENTRY_PREFIX}{id}")
}
