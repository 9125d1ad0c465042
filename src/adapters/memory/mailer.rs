//! Recording mailer for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::EmailAddress;
use crate::ports::{MailError, Mailer};

/// A dispatched magic link, as captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMagicLink {
    pub to: String,
    pub link: String,
    pub new_user: bool,
}

/// Mailer that records every dispatch instead of sending anything.
///
/// Can be switched into a failing mode to exercise delivery-failure
/// handling.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMagicLink>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, in order.
    pub fn sent(&self) -> Vec<SentMagicLink> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Makes every subsequent send fail with a network error.
    pub fn fail_with_network(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_magic_link(
        &self,
        to: &EmailAddress,
        link: &str,
        new_user: bool,
    ) -> Result<(), MailError> {
        if let Some(message) = self
            .fail_with
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(MailError::Network(message));
        }

        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentMagicLink {
                to: to.as_str().to_string(),
                link: link.to_string(),
                new_user,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_dispatches_in_order() {
        let mailer = RecordingMailer::new();
        let email = EmailAddress::parse("a@b.com").unwrap();

        mailer
            .send_magic_link(&email, "https://x/verify?token=1", true)
            .await
            .unwrap();
        mailer
            .send_magic_link(&email, "https://x/verify?token=2", false)
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].new_user);
        assert!(!sent[1].new_user);
    }

    #[tokio::test]
    async fn failing_mode_returns_network_error() {
        let mailer = RecordingMailer::new();
        mailer.fail_with_network("connection refused");
        let email = EmailAddress::parse("a@b.com").unwrap();

        let result = mailer.send_magic_link(&email, "https://x", false).await;

        assert!(matches!(result, Err(MailError::Network(_))));
        assert!(mailer.sent().is_empty());
    }
}
