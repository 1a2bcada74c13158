// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent storage for Latchkey: a SQLite-backed key-value store
//! implementing the `KeyValueStore` boundary with change notifications.

pub mod sqlite;

pub use sqlite::SqliteKv;
