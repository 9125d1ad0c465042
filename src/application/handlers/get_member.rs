//! GetMemberHandler - resolve a session cookie to the member record.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::auth::Session;
use crate::domain::member::MemberRecord;
use crate::ports::{session_key, user_key, KvError, KvStore};

/// Command to fetch the current member's record.
#[derive(Debug, Clone)]
pub struct GetMemberCommand {
    /// Session id from the cookie, if the caller presented one.
    pub session_id: Option<String>,
}

/// Why a member lookup came back unauthenticated. Distinguished for
/// logging only; callers see a uniform rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthenticatedReason {
    NoCookie,
    NoSession,
    NoRecord,
}

/// Outcome of a member lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum GetMemberOutcome {
    Unauthenticated(UnauthenticatedReason),
    Member(MemberRecord),
}

#[derive(Debug, Error)]
pub enum GetMemberError {
    #[error(transparent)]
    Store(#[from] KvError),

    #[error("Corrupt stored value: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Resolves sessions to member records across the two store namespaces.
pub struct GetMemberHandler {
    users: Arc<dyn KvStore>,
    sessions: Arc<dyn KvStore>,
}

impl GetMemberHandler {
    pub fn new(users: Arc<dyn KvStore>, sessions: Arc<dyn KvStore>) -> Self {
        Self { users, sessions }
    }

    pub async fn handle(&self, cmd: GetMemberCommand) -> Result<GetMemberOutcome, GetMemberError> {
        let Some(session_id) = cmd.session_id else {
            return Ok(GetMemberOutcome::Unauthenticated(
                UnauthenticatedReason::NoCookie,
            ));
        };

        let Some(raw_session) = self.sessions.get(&session_key(&session_id)).await? else {
            tracing::info!("Member lookup with unknown or expired session");
            return Ok(GetMemberOutcome::Unauthenticated(
                UnauthenticatedReason::NoSession,
            ));
        };
        let session: Session = serde_json::from_str(&raw_session)?;

        let Some(raw_record) = self.users.get(&user_key(&session.email)).await? else {
            // Live session but the backing record is gone.
            tracing::warn!(email = %session.email, "Session references a missing member record");
            return Ok(GetMemberOutcome::Unauthenticated(
                UnauthenticatedReason::NoRecord,
            ));
        };
        let record: MemberRecord = serde_json::from_str(&raw_record)?;

        Ok(GetMemberOutcome::Member(record))
    }
}
