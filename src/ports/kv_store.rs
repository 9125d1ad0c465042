//! Durable KV store port.
//!
//! The store is the sole owner of all persisted state: user records,
//! login tokens and sessions. The handler process itself holds nothing
//! across requests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a KV store implementation.
///
/// All variants are transient from the caller's perspective and map to a
/// 5xx at the HTTP boundary so upstream retry machinery can kick in.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("KV store unavailable: {0}")]
    Unavailable(String),
}

/// Capability interface over a durable mapping store with per-key TTL.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Writes `value` under `key`, optionally expiring after `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), KvError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}

/// Key for a member record.
pub fn user_key(email: &str) -> String {
    format!("user:{}", email)
}

/// Key for a login token.
pub fn token_key(id: &str) -> String {
    format!("token:{}", id)
}

/// Key for a session.
pub fn session_key(id: &str) -> String {
    format!("session:{}", id)
}
