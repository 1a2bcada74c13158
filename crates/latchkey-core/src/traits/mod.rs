// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The vault core talks to three external collaborators, each behind a trait:
//! the persistent key-value store, the cross-process messaging channel, and
//! the inspected page's DOM. Concrete bindings live outside this crate.

pub mod dom;
pub mod kv;
pub mod messaging;

pub use dom::PageDom;
pub use kv::KeyValueStore;
pub use messaging::Messenger;
