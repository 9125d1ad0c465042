//! Redis-backed KV store for production deployments.
//!
//! All three entity kinds (user records, login tokens, sessions) live in
//! Redis; TTLs are delegated to Redis expiry so tokens and sessions age
//! out without any sweeper process.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::config::KvConfig;
use crate::ports::{KvError, KvStore};

/// Production KV store over a multiplexed Redis connection.
///
/// The connection is cheap to clone and safe to share across handlers.
/// Every operation is capped by the configured per-operation timeout so a
/// stalled Redis surfaces as `Unavailable` instead of hanging the request.
#[derive(Clone)]
pub struct RedisKvStore {
    conn: MultiplexedConnection,
    op_timeout: Duration,
}

impl RedisKvStore {
    pub fn new(conn: MultiplexedConnection, op_timeout: Duration) -> Self {
        Self { conn, op_timeout }
    }

    /// Opens a connection per the KV configuration.
    pub async fn connect(config: &KvConfig) -> Result<Self, KvError> {
        let client =
            redis::Client::open(config.url.as_str()).map_err(|e| KvError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn, config.timeout()))
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, redis::RedisError>>,
    ) -> Result<T, KvError> {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result.map_err(|e| KvError::Unavailable(e.to_string())),
            Err(_) => Err(KvError::Unavailable(format!(
                "Redis operation timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn.clone();
        self.bounded(async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        let value = value.to_string();
        self.bounded(async move {
            match ttl {
                Some(ttl) => {
                    // SET with EX rather than SETEX so the write and expiry
                    // are one atomic command.
                    redis::cmd("SET")
                        .arg(&key)
                        .arg(&value)
                        .arg("EX")
                        .arg(ttl.as_secs())
                        .query_async::<_, ()>(&mut conn)
                        .await
                }
                None => conn.set::<_, _, ()>(&key, &value).await,
            }
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        let key = key.to_string();
        self.bounded(async move { conn.del::<_, ()>(&key).await })
            .await
    }
}

impl std::fmt::Debug for RedisKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKvStore")
            .field("op_timeout", &self.op_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    // Redis integration tests need a running instance and are run
    // separately from unit tests.
    //
    // #[tokio::test]
    // #[ignore] // Run with: cargo test -- --ignored
    // async fn test_redis_kv_roundtrip() {
    //     let config = KvConfig {
    //         url: "redis://127.0.0.1:6379".to_string(),
    //         ..Default::default()
    //     };
    //     let store = RedisKvStore::connect(&config).await.unwrap();
    //     store.put("user:a@b.com", "{}", None).await.unwrap();
    //     assert!(store.get("user:a@b.com").await.unwrap().is_some());
    // }
}
