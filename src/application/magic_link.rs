//! Token issuance and magic-link dispatch.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::domain::auth::{opaque_id, LoginToken, TOKEN_TTL_SECS};
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::ports::{token_key, KvError, KvStore, MailError, Mailer};

/// Errors from issuing or dispatching a magic link.
#[derive(Debug, Error)]
pub enum MagicLinkError {
    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Issues single-use login tokens and dispatches them by email.
///
/// Token collisions are not re-checked; at 256 random bits the
/// probability is negligible.
#[derive(Clone)]
pub struct MagicLinkSender {
    store: Arc<dyn KvStore>,
    mailer: Arc<dyn Mailer>,
    site_url: String,
}

impl MagicLinkSender {
    pub fn new(store: Arc<dyn KvStore>, mailer: Arc<dyn Mailer>, site_url: impl Into<String>) -> Self {
        Self {
            store,
            mailer,
            site_url: site_url.into(),
        }
    }

    /// Generates a token, stores it with a 30-minute TTL bound to `email`,
    /// and sends the verification link.
    pub async fn issue_and_send(
        &self,
        email: &EmailAddress,
        new_user: bool,
    ) -> Result<(), MagicLinkError> {
        let token_id = opaque_id();
        let token = LoginToken::issue(email, Timestamp::now());
        let value = serde_json::to_string(&token)
            .map_err(|e| KvError::Unavailable(format!("Failed to encode token: {}", e)))?;

        self.store
            .put(
                &token_key(&token_id),
                &value,
                Some(Duration::from_secs(TOKEN_TTL_SECS)),
            )
            .await?;

        let link = format!("{}/auth/verify?token={}", self.site_url, token_id);
        self.mailer.send_magic_link(email, &link, new_user).await?;

        tracing::info!(email = %email, new_user, "Magic link dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryKvStore, RecordingMailer};

    fn sender(
        store: Arc<InMemoryKvStore>,
        mailer: Arc<RecordingMailer>,
    ) -> MagicLinkSender {
        MagicLinkSender::new(store, mailer, "https://members.example.com")
    }

    #[tokio::test]
    async fn stores_token_with_thirty_minute_ttl() {
        let store = Arc::new(InMemoryKvStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let email = EmailAddress::parse("a@b.com").unwrap();

        sender(store.clone(), mailer.clone())
            .issue_and_send(&email, false)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        let token_id = sent[0].link.rsplit("token=").next().unwrap();
        assert_eq!(token_id.len(), 64);
        assert_eq!(
            store.stored_ttl(&token_key(token_id)),
            Some(Duration::from_secs(1800))
        );
    }

    #[tokio::test]
    async fn link_points_at_site_verify_endpoint() {
        let store = Arc::new(InMemoryKvStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let email = EmailAddress::parse("a@b.com").unwrap();

        sender(store, mailer.clone())
            .issue_and_send(&email, true)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert!(sent[0]
            .link
            .starts_with("https://members.example.com/auth/verify?token="));
        assert!(sent[0].new_user);
    }

    #[tokio::test]
    async fn mail_failure_surfaces_as_mail_error() {
        let store = Arc::new(InMemoryKvStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        mailer.fail_with_network("provider down");
        let email = EmailAddress::parse("a@b.com").unwrap();

        let result = sender(store.clone(), mailer)
            .issue_and_send(&email, false)
            .await;

        assert!(matches!(result, Err(MagicLinkError::Mail(_))));
        // the token was already persisted; it will simply expire unused
        assert_eq!(store.len(), 1);
    }
}
