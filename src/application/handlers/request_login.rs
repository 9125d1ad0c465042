//! RequestLoginHandler - issue a magic link for an existing member.

use std::sync::Arc;

use thiserror::Error;

use crate::application::magic_link::{MagicLinkError, MagicLinkSender};
use crate::domain::foundation::EmailAddress;
use crate::ports::{user_key, KvError, KvStore};

/// Command to request a login link.
#[derive(Debug, Clone)]
pub struct RequestLoginCommand {
    /// Raw email as submitted by the caller.
    pub email: String,
}

/// Errors surfaced to the login-request endpoint.
#[derive(Debug, Error)]
pub enum RequestLoginError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error(transparent)]
    Store(#[from] KvError),
}

/// Handles login-link requests.
///
/// The boundary protocol never reveals whether an email corresponds to a
/// known account: unknown emails and delivery failures both report
/// success. Only malformed input and store outages surface.
pub struct RequestLoginHandler {
    users: Arc<dyn KvStore>,
    magic_link: MagicLinkSender,
}

impl RequestLoginHandler {
    pub fn new(users: Arc<dyn KvStore>, magic_link: MagicLinkSender) -> Self {
        Self { users, magic_link }
    }

    pub async fn handle(&self, cmd: RequestLoginCommand) -> Result<(), RequestLoginError> {
        let email =
            EmailAddress::parse(&cmd.email).map_err(|_| RequestLoginError::InvalidEmail)?;

        let known_user = self.users.get(&user_key(email.as_str())).await?.is_some();
        if !known_user {
            tracing::info!(email = %email, "Login requested for unknown email, no link sent");
            return Ok(());
        }

        match self.magic_link.issue_and_send(&email, false).await {
            Ok(()) => Ok(()),
            Err(MagicLinkError::Mail(err)) => {
                // Swallowed: reporting delivery failure would leak account
                // existence to the caller.
                tracing::warn!(email = %email, error = %err, "Magic link delivery failed");
                Ok(())
            }
            Err(MagicLinkError::Store(err)) => Err(err.into()),
        }
    }
}
