// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! # Session Manager
//!
//! Generic JSON wrapper over the [`SessionStore`]. One manager is constructed
//! per request, bound to the request's session-cookie id, and handed to
//! handlers through request extensions; the in-memory cached copy means
//! repeated reads within a request never hit the store twice.
//!
//! ## Concurrency
//!
//! `update_session` is a plain read-modify-write with no version token:
//! concurrent submissions from two browser tabs race and the last write wins.
//! This mirrors the behavior of the distributed cache the store fronts and is
//! an accepted limitation of the session model.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::session::JourneySession;
use crate::infrastructure::session_store::SessionStore;

/// Fixed store sub-key for the journey-session aggregate.
pub const JOURNEY_SESSION_KEY: &str = "journey-session";

/// Per-request session accessor for one aggregate type `T`.
pub struct SessionManager<T> {
    store: Arc<dyn SessionStore>,
    key: String,
    idle_timeout: Duration,
    cache: RwLock<Option<T>>,
}

/// The only aggregate the portal stores today.
pub type JourneySessions = SessionManager<JourneySession>;

impl<T> SessionManager<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync,
{
    pub fn new(
        store: Arc<dyn SessionStore>,
        session_id: Uuid,
        sub_key: &str,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            key: format!("{session_id}:{sub_key}"),
            idle_timeout,
            cache: RwLock::new(None),
        }
    }

    /// Load the stored aggregate, or `None` when absent/expired.
    pub async fn get_session(&self) -> Result<Option<T>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(Some(cached.clone()));
        }
        let Some(bytes) = self.store.load(&self.key).await? else {
            return Ok(None);
        };
        let value: T =
            serde_json::from_slice(&bytes).context("failed to deserialize stored session")?;
        *self.cache.write().await = Some(value.clone());
        Ok(Some(value))
    }

    /// Persist the aggregate and refresh the request-local cache.
    pub async fn save_session(&self, value: T) -> Result<()> {
        let bytes = serde_json::to_vec(&value).context("failed to serialize session")?;
        self.store.save(&self.key, bytes, self.idle_timeout).await?;
        *self.cache.write().await = Some(value);
        Ok(())
    }

    /// Load (or create) the aggregate, apply `mutate`, and persist the result.
    ///
    /// Last write wins; there is no detection of concurrent modification from
    /// other tabs or requests.
    pub async fn update_session<F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.get_session().await?.unwrap_or_default();
        mutate(&mut value);
        self.save_session(value.clone()).await?;
        Ok(value)
    }

    /// Drop the stored aggregate, e.g. on sign-out.
    pub async fn remove_session(&self) -> Result<()> {
        self.store.remove(&self.key).await?;
        *self.cache.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::session_store::InMemorySessionStore;

    fn manager(store: Arc<InMemorySessionStore>, id: Uuid) -> JourneySessions {
        SessionManager::new(store, id, JOURNEY_SESSION_KEY, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn save_then_get_returns_field_equal_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let sessions = manager(store, Uuid::new_v4());

        let mut session = JourneySession::default();
        session.account_management.journey.visit("manage");
        session.account_management.invited_email = Some("a@example.com".to_string());
        sessions.save_session(session.clone()).await.unwrap();

        let loaded = sessions.get_session().await.unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn update_creates_default_session_when_absent() {
        let store = Arc::new(InMemorySessionStore::new());
        let sessions = manager(store, Uuid::new_v4());

        let updated = sessions
            .update_session(|s| s.account_management.journey.visit("manage"))
            .await
            .unwrap();
        assert_eq!(updated.account_management.journey.pages(), ["manage"]);
    }

    #[tokio::test]
    async fn updates_are_visible_through_a_second_manager() {
        let store = Arc::new(InMemorySessionStore::new());
        let session_id = Uuid::new_v4();

        let first = manager(store.clone(), session_id);
        first
            .update_session(|s| s.is_compliance_scheme = true)
            .await
            .unwrap();

        // A later request builds a fresh manager over the same store key.
        let second = manager(store, session_id);
        let loaded = second.get_session().await.unwrap().unwrap_or_default();
        assert!(loaded.is_compliance_scheme);
    }

    #[tokio::test]
    async fn remove_discards_state_and_cache() {
        let store = Arc::new(InMemorySessionStore::new());
        let sessions = manager(store, Uuid::new_v4());

        sessions
            .update_session(|s| s.account_management.journey.visit("manage"))
            .await
            .unwrap();
        sessions.remove_session().await.unwrap();
        assert_eq!(sessions.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn distinct_session_ids_do_not_share_state() {
        let store = Arc::new(InMemorySessionStore::new());
        let a = manager(store.clone(), Uuid::new_v4());
        let b = manager(store, Uuid::new_v4());

        a.update_session(|s| s.is_compliance_scheme = true)
            .await
            .unwrap();
        assert_eq!(b.get_session().await.unwrap(), None);
    }
}
