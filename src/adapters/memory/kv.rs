//! In-memory KV store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::ports::{KvError, KvStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
    ttl: Option<Duration>,
}

/// In-process KV store with per-key expiry, checked lazily on read.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the TTL a key was stored with, for assertions in tests.
    pub fn stored_ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .and_then(|entry| entry.ttl)
    }

    /// Marks a key as already expired without waiting for its TTL.
    pub fn force_expire(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() - Duration::from_secs(1));
        }
    }

    /// Number of live keys, ignoring lazily-expired entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|entry| entry.expires_at.map(|at| at > now).unwrap_or(true))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.expires_at.map(|at| at <= Instant::now()).unwrap_or(false) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), KvError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
            ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let store = InMemoryKvStore::new();
        store.put("k", "v", None).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_key() {
        let store = InMemoryKvStore::new();
        store.put("k", "v", None).await.unwrap();
        store.delete("k").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_absent_key_is_not_an_error() {
        let store = InMemoryKvStore::new();
        assert!(store.delete("missing").await.is_ok());
    }

    #[tokio::test]
    async fn expired_key_reads_as_absent() {
        let store = InMemoryKvStore::new();
        store
            .put("k", "v", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        store.force_expire("k");

        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_ttl_is_observable() {
        let store = InMemoryKvStore::new();
        store
            .put("k", "v", Some(Duration::from_secs(1800)))
            .await
            .unwrap();

        assert_eq!(store.stored_ttl("k"), Some(Duration::from_secs(1800)));
        assert_eq!(store.stored_ttl("other"), None);
    }

    #[tokio::test]
    async fn overwrite_replaces_value_and_ttl() {
        let store = InMemoryKvStore::new();
        store
            .put("k", "v1", Some(Duration::from_secs(60)))
            .await
            .unwrap();
        store.put("k", "v2", None).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
        assert_eq!(store.stored_ttl("k"), None);
    }
}
