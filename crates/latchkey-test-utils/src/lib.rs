// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Latchkey integration tests.
//!
//! Provides in-memory doubles for the three collaborator boundaries, for
//! fast, deterministic, CI-runnable tests without a browser or a database.
//!
//! # Components
//!
//! - [`MemoryKv`] - In-memory `KeyValueStore` with change notifications
//! - [`FakePage`] - Scriptable `PageDom` with tracked writes
//! - [`MockMessenger`] - `Messenger` with captured requests and scripted responses

pub mod fake_page;
pub mod memory_kv;
pub mod mock_messenger;

pub use fake_page::FakePage;
pub use memory_kv::MemoryKv;
pub use mock_messenger::MockMessenger;
