//! Single-use login tokens for magic-link authentication.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmailAddress, Timestamp};

/// Login token lifetime (30 minutes), mirrored by the store-level TTL.
pub const TOKEN_TTL_SECS: u64 = 30 * 60;

/// Payload stored under `token:<hex-id>`.
///
/// The absolute expiry is redundant with the store TTL and checked
/// explicitly as defense in depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginToken {
    /// Target identity for the login.
    pub email: String,

    /// Absolute expiry, unix seconds.
    pub expires: u64,
}

impl LoginToken {
    /// Issues a token for the given identity, expiring [`TOKEN_TTL_SECS`]
    /// from `now`.
    pub fn issue(email: &EmailAddress, now: Timestamp) -> Self {
        Self {
            email: email.as_str().to_string(),
            expires: now.plus_secs(TOKEN_TTL_SECS).as_unix_secs(),
        }
    }

    /// Whether the token has passed its explicit expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.as_unix_secs() > self.expires
    }
}
