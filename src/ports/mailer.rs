//! Outbound transactional email port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::EmailAddress;

/// Errors surfaced by a mailer implementation.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Email provider unreachable: {0}")]
    Network(String),

    #[error("Email provider rejected the request: {0}")]
    Provider(String),
}

/// Capability interface for magic-link dispatch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a magic-link email.
    ///
    /// `new_user` selects the welcome variant used after a purchase;
    /// otherwise the plain login variant is sent.
    async fn send_magic_link(
        &self,
        to: &EmailAddress,
        link: &str,
        new_user: bool,
    ) -> Result<(), MailError>;
}
