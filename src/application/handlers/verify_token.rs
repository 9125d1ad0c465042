//! VerifyTokenHandler - exchange a one-time token for a session.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::auth::{opaque_id, LoginToken, Session, SESSION_TTL_SECS};
use crate::domain::foundation::Timestamp;
use crate::ports::{session_key, token_key, KvError, KvStore};

/// Command to verify a login token from a magic link.
#[derive(Debug, Clone)]
pub struct VerifyTokenCommand {
    /// The `token` query parameter, if present.
    pub token: Option<String>,
}

/// Outcome of a verification attempt.
///
/// Verification is one-shot and destructive: the token is deleted on any
/// attempt that finds it, valid or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyTokenOutcome {
    /// No token parameter was supplied.
    MissingToken,
    /// Token absent from the store or past its explicit expiry.
    Expired,
    /// Token consumed; a 30-day session was created.
    SessionCreated { session_id: String },
}

/// Errors surfaced to the verify endpoint.
#[derive(Debug, Error)]
pub enum VerifyTokenError {
    #[error(transparent)]
    Store(#[from] KvError),

    #[error("Corrupt stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Handles the token -> session transition.
pub struct VerifyTokenHandler {
    /// Token/session store namespace.
    store: Arc<dyn KvStore>,
}

impl VerifyTokenHandler {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: VerifyTokenCommand,
    ) -> Result<VerifyTokenOutcome, VerifyTokenError> {
        let Some(token_id) = cmd.token else {
            return Ok(VerifyTokenOutcome::MissingToken);
        };

        let key = token_key(&token_id);
        let Some(raw) = self.store.get(&key).await? else {
            tracing::info!("Verification attempted with unknown or expired token");
            return Ok(VerifyTokenOutcome::Expired);
        };

        // Single-use regardless of outcome: consume before judging.
        self.store.delete(&key).await?;

        let token: LoginToken = serde_json::from_str(&raw)?;
        let now = Timestamp::now();
        if token.is_expired(now) {
            tracing::info!(email = %token.email, "Token past explicit expiry");
            return Ok(VerifyTokenOutcome::Expired);
        }

        let session_id = opaque_id();
        let session = Session::start(token.email.clone(), now);
        self.store
            .put(
                &session_key(&session_id),
                &serde_json::to_string(&session)?,
                Some(Duration::from_secs(SESSION_TTL_SECS)),
            )
            .await?;

        tracing::info!(email = %token.email, "Session created from magic link");
        Ok(VerifyTokenOutcome::SessionCreated { session_id })
    }
}
