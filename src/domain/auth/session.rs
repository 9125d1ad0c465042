//! Cookie-bound sessions created by token verification.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Session lifetime (30 days); no sliding expiration.
pub const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Payload stored under `session:<hex-id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Authenticated identity.
    pub email: String,

    /// When the session was created.
    pub created_at: Timestamp,
}

impl Session {
    /// Starts a session for a freshly verified identity.
    pub fn start(email: impl Into<String>, now: Timestamp) -> Self {
        Self {
            email: email.into(),
            created_at: now,
        }
    }
}
