//! LogoutHandler - discard a session.

use std::sync::Arc;

use thiserror::Error;

use crate::ports::{session_key, KvError, KvStore};

/// Command to end a session.
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    /// Session id from the cookie, if the caller presented one.
    pub session_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum LogoutError {
    #[error(transparent)]
    Store(#[from] KvError),
}

/// Deletes the server-side session record. Logout is idempotent: absent
/// or unknown sessions succeed the same as live ones.
pub struct LogoutHandler {
    store: Arc<dyn KvStore>,
}

impl LogoutHandler {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: LogoutCommand) -> Result<(), LogoutError> {
        if let Some(session_id) = cmd.session_id {
            self.store.delete(&session_key(&session_id)).await?;
            tracing::info!("Session ended");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKvStore;

    #[tokio::test]
    async fn deletes_presented_session() {
        let store = Arc::new(InMemoryKvStore::new());
        store
            .put(&session_key("abc"), r#"{"email":"a@b.com"}"#, None)
            .await
            .unwrap();

        LogoutHandler::new(store.clone())
            .handle(LogoutCommand {
                session_id: Some("abc".to_string()),
            })
            .await
            .unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_cookie_is_a_no_op() {
        let store = Arc::new(InMemoryKvStore::new());
        LogoutHandler::new(store.clone())
            .handle(LogoutCommand { session_id: None })
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unknown_session_still_succeeds() {
        let store = Arc::new(InMemoryKvStore::new());
        let result = LogoutHandler::new(store)
            .handle(LogoutCommand {
                session_id: Some("never-issued".to_string()),
            })
            .await;
        assert!(result.is_ok());
    }
}
