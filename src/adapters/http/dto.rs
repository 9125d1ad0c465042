//! Request/response DTOs for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::domain::member::MemberRecord;

/// Body for `POST /auth/request-login`.
#[derive(Debug, Deserialize)]
pub struct RequestLoginRequest {
    #[serde(default)]
    pub email: String,
}

/// Query string for `GET /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub token: Option<String>,
}

/// Uniform success acknowledgement.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Webhook acknowledgement; sent for every delivery we accept.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Standard error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Body for `GET /api/member`. The member record serializes with its
/// stored camelCase field names, which is exactly the contract shape.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct MemberResponse(pub MemberRecord);
