// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Distributed session store seam.
//!
//! Production deployments back this with Redis; the portal only depends on the
//! [`SessionStore`] trait so the backing cache is swappable. The in-memory
//! implementation here serves local development and tests, with the same
//! sliding idle-timeout semantics the distributed cache applies.

use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

/// Byte-oriented key/value store with per-entry sliding idle timeout.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the value for `key`, refreshing its idle deadline. Expired or absent
    /// entries both return `None`.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key` with the given idle timeout.
    async fn save(&self, key: &str, value: Vec<u8>, idle_timeout: Duration) -> Result<()>;

    /// Remove the entry for `key`, if any.
    async fn remove(&self, key: &str) -> Result<()>;
}

struct Entry {
    value: Vec<u8>,
    idle_timeout: Duration,
    deadline: Instant,
}

/// Process-local [`SessionStore`] used for local development and tests.
pub struct InMemorySessionStore {
    entries: DashMap<String, Entry>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        if let Some(mut entry) = self.entries.get_mut(key) {
            if entry.deadline <= now {
                drop(entry);
                self.entries.remove(key);
                return Ok(None);
            }
            // Sliding expiration: reading keeps the session alive.
            entry.deadline = now + entry.idle_timeout;
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn save(&self, key: &str, value: Vec<u8>, idle_timeout: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                idle_timeout,
                deadline: Instant::now() + idle_timeout,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        store
            .save("sid:journey", b"{}".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let loaded = store.load("sid:journey").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(b"{}".as_slice()));
    }

    #[tokio::test]
    async fn expired_entry_behaves_as_absent() {
        let store = InMemorySessionStore::new();
        store
            .save("sid:journey", b"{}".to_vec(), Duration::ZERO)
            .await
            .unwrap();

        assert!(store.load("sid:journey").await.unwrap().is_none());
        // A second load after expiry-removal is still absent.
        assert!(store.load("sid:journey").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_deletes_the_entry() {
        let store = InMemorySessionStore::new();
        store
            .save("sid:journey", b"{}".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store.remove("sid:journey").await.unwrap();
        assert!(store.load("sid:journey").await.unwrap().is_none());
    }
}
