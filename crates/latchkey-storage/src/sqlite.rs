// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of the key-value store boundary.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional connections for writes against the same
//! database file.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio::sync::broadcast;
use tracing::{debug, info};

use latchkey_core::{KeyChange, KeyValueStore, LatchkeyError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

/// Persistent `KeyValueStore` over a single SQLite database file.
pub struct SqliteKv {
    conn: tokio_rusqlite::Connection,
    changes: broadcast::Sender<KeyChange>,
}

impl SqliteKv {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn open(path: &str) -> Result<Self, LatchkeyError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| read_err(e.into()))?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(write_err)?;

        info!(path, "key-value store opened");
        let (changes, _) = broadcast::channel(64);
        Ok(Self { conn, changes })
    }

    fn notify(&self, key: &str) {
        // Send fails only when nobody is watching.
        let _ = self.changes.send(KeyChange {
            key: key.to_string(),
        });
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<String>, LatchkeyError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()
            })
            .await
            .map_err(read_err)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), LatchkeyError> {
        let owned_key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![owned_key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(write_err)?;

        debug!(key, "key written");
        self.notify(key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LatchkeyError> {
        let owned_key = key.to_string();
        let removed = self
            .conn
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM kv WHERE key = ?1", params![owned_key])
            })
            .await
            .map_err(write_err)?;

        if removed > 0 {
            debug!(key, "key removed");
            self.notify(key);
        }
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LatchkeyError> {
        // LIKE would need wildcard escaping; a range scan on the primary key
        // is both exact and indexed.
        let prefix = prefix.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT key FROM kv WHERE key >= ?1 ORDER BY key")?;
                let rows = stmt.query_map(params![prefix.clone()], |row| row.get::<_, String>(0))?;
                let mut keys = Vec::new();
                for row in rows {
                    let key = row?;
                    if !key.starts_with(&prefix) {
                        break;
                    }
                    keys.push(key);
                }
                Ok(keys)
            })
            .await
            .map_err(read_err)
    }

    fn watch(&self) -> broadcast::Receiver<KeyChange> {
        self.changes.subscribe()
    }
}

fn read_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LatchkeyError {
    LatchkeyError::StorageRead {
        source: Box::new(e),
    }
}

fn write_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LatchkeyError {
    LatchkeyError::StorageWrite {
        source: Box::new(e),
    }
}
