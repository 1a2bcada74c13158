// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle for Latchkey: the master-secret gate, the encrypted entry
//! store, the pending-capture mailbox, and the controller that fronts them.
//!
//! The master secret exists only in memory while unlocked; storage holds
//! nothing but envelopes, a verifier, and the transient pending slot.

pub mod controller;
pub mod gate;
pub mod mailbox;
pub mod store;

pub use controller::VaultController;
pub use gate::{GateStatus, MasterGate};
pub use mailbox::CaptureMailbox;
pub use store::{EntryDraft, StoredEntry, VaultEntry, VaultStore};
