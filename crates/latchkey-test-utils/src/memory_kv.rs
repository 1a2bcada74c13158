// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value store for deterministic testing.
//!
//! `MemoryKv` implements `KeyValueStore` over a plain map, with the same
//! change-notification contract as the persistent store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use latchkey_core::{KeyChange, KeyValueStore, LatchkeyError};

/// An in-memory `KeyValueStore` for tests.
pub struct MemoryKv {
    map: Arc<Mutex<BTreeMap<String, String>>>,
    changes: broadcast::Sender<KeyChange>,
    fail_reads: Mutex<bool>,
    fail_writes: Mutex<bool>,
}

impl MemoryKv {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            map: Arc::new(Mutex::new(BTreeMap::new())),
            changes,
            fail_reads: Mutex::new(false),
            fail_writes: Mutex::new(false),
        }
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.map.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.map.lock().await.is_empty()
    }

    /// Make every subsequent `get`/`keys_with_prefix` fail, for exercising
    /// read-error propagation.
    pub async fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().await = fail;
    }

    /// Make every subsequent `set`/`remove` fail, for exercising write-error
    /// propagation.
    pub async fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().await = fail;
    }

    fn injected(kind: &str) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(std::io::Error::other(format!("injected {kind} failure")))
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, LatchkeyError> {
        if *self.fail_reads.lock().await {
            return Err(LatchkeyError::StorageRead {
                source: Self::injected("read"),
            });
        }
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), LatchkeyError> {
        if *self.fail_writes.lock().await {
            return Err(LatchkeyError::StorageWrite {
                source: Self::injected("write"),
            });
        }
        self.map.lock().await.insert(key.to_string(), value);
        let _ = self.changes.send(KeyChange {
            key: key.to_string(),
        });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LatchkeyError> {
        if *self.fail_writes.lock().await {
            return Err(LatchkeyError::StorageWrite {
                source: Self::injected("write"),
            });
        }
        let removed = self.map.lock().await.remove(key).is_some();
        if removed {
            let _ = self.changes.send(KeyChange {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, LatchkeyError> {
        if *self.fail_reads.lock().await {
            return Err(LatchkeyError::StorageRead {
                source: Self::injected("read"),
            });
        }
        Ok(self
            .map
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn watch(&self) -> broadcast::Receiver<KeyChange> {
        self.changes.subscribe()
    }
}
