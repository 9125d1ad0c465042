//! HTTP handlers wiring axum routes to the application layer.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;

use crate::application::handlers::{
    GetMemberCommand, GetMemberError, GetMemberHandler, GetMemberOutcome, LogoutCommand,
    LogoutError, LogoutHandler, ProcessWebhookCommand, ProcessWebhookError, ProcessWebhookHandler,
    ProcessWebhookOutcome, RequestLoginCommand, RequestLoginError, RequestLoginHandler,
    VerifyTokenCommand, VerifyTokenError, VerifyTokenHandler, VerifyTokenOutcome,
};
use crate::application::magic_link::MagicLinkSender;
use crate::ports::{KvStore, Mailer};

use super::dto::{
    ErrorResponse, MemberResponse, RequestLoginRequest, SuccessResponse, VerifyParams, WebhookAck,
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Session lifetime communicated to the browser, matching the stored TTL.
const COOKIE_MAX_AGE_SECS: u64 = crate::domain::auth::SESSION_TTL_SECS;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// KV namespace holding member records.
    pub users: Arc<dyn KvStore>,
    /// KV namespace holding login tokens and sessions.
    pub sessions: Arc<dyn KvStore>,
    pub mailer: Arc<dyn Mailer>,
    pub webhook_secret: SecretString,
    /// Site base URL, no trailing slash. Magic links and post-verify
    /// redirects point here.
    pub site_url: String,
}

impl AppState {
    fn magic_link_sender(&self) -> MagicLinkSender {
        MagicLinkSender::new(
            self.sessions.clone(),
            self.mailer.clone(),
            self.site_url.clone(),
        )
    }

    fn request_login_handler(&self) -> RequestLoginHandler {
        RequestLoginHandler::new(self.users.clone(), self.magic_link_sender())
    }

    fn verify_token_handler(&self) -> VerifyTokenHandler {
        VerifyTokenHandler::new(self.sessions.clone())
    }

    fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new(self.sessions.clone())
    }

    fn get_member_handler(&self) -> GetMemberHandler {
        GetMemberHandler::new(self.users.clone(), self.sessions.clone())
    }

    fn webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.users.clone(),
            self.magic_link_sender(),
            self.webhook_secret.clone(),
        )
    }
}

/// Extracts the session id from the `Cookie` header, if present.
fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Max-Age={}; Path=/",
        SESSION_COOKIE, session_id, COOKIE_MAX_AGE_SECS
    )
}

fn clearing_cookie() -> String {
    format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Max-Age=0; Path=/",
        SESSION_COOKIE
    )
}

/// GET /health - liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /auth/request-login - issue a magic link for an existing member.
pub async fn request_login(
    State(state): State<AppState>,
    Json(request): Json<RequestLoginRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let handler = state.request_login_handler();
    handler
        .handle(RequestLoginCommand {
            email: request.email,
        })
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// GET /auth/verify - consume a login token, establish a session.
///
/// Always responds with a redirect into the site: the members page with a
/// fresh cookie on success, the login page with an error code otherwise.
pub async fn verify_token(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<Response, ApiError> {
    let handler = state.verify_token_handler();
    let outcome = handler
        .handle(VerifyTokenCommand {
            token: params.token,
        })
        .await?;

    let response = match outcome {
        VerifyTokenOutcome::MissingToken => redirect(format!(
            "{}/login.html?error=invalid",
            state.site_url
        )),
        VerifyTokenOutcome::Expired => redirect(format!(
            "{}/login.html?error=expired",
            state.site_url
        )),
        VerifyTokenOutcome::SessionCreated { session_id } => (
            StatusCode::FOUND,
            [
                (header::LOCATION, format!("{}/members.html", state.site_url)),
                (header::SET_COOKIE, session_cookie(&session_id)),
            ],
        )
            .into_response(),
    };

    Ok(response)
}

fn redirect(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// POST /auth/logout - drop the session, clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let handler = state.logout_handler();
    handler
        .handle(LogoutCommand {
            session_id: session_from_headers(&headers),
        })
        .await?;

    // The cookie is cleared even if no session was presented.
    Ok((
        [(header::SET_COOKIE, clearing_cookie())],
        Json(SuccessResponse::ok()),
    )
        .into_response())
}

/// GET /api/member - the authenticated member's record.
pub async fn get_member(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MemberResponse>, ApiError> {
    let handler = state.get_member_handler();
    let outcome = handler
        .handle(GetMemberCommand {
            session_id: session_from_headers(&headers),
        })
        .await?;

    match outcome {
        GetMemberOutcome::Member(record) => Ok(Json(MemberResponse(record))),
        GetMemberOutcome::Unauthenticated(reason) => {
            tracing::debug!(?reason, "Member fetch rejected");
            Err(ApiError::Unauthorized)
        }
    }
}

/// POST /webhook - payment provider event delivery.
pub async fn process_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let handler = state.webhook_handler();
    let outcome = handler
        .handle(ProcessWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    // Applied, dropped and ignored all acknowledge with 200 so the
    // provider does not redeliver.
    match outcome {
        ProcessWebhookOutcome::Applied
        | ProcessWebhookOutcome::Dropped
        | ProcessWebhookOutcome::Ignored => Ok(Json(WebhookAck::received())),
    }
}

/// API error type mapping application errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<RequestLoginError> for ApiError {
    fn from(err: RequestLoginError) -> Self {
        match err {
            RequestLoginError::InvalidEmail => {
                ApiError::BadRequest("Invalid email address".to_string())
            }
            RequestLoginError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<VerifyTokenError> for ApiError {
    fn from(err: VerifyTokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<LogoutError> for ApiError {
    fn from(err: LogoutError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<GetMemberError> for ApiError {
    fn from(err: GetMemberError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<ProcessWebhookError> for ApiError {
    fn from(err: ProcessWebhookError) -> Self {
        match err {
            ProcessWebhookError::InvalidSignature => ApiError::Unauthorized,
            ProcessWebhookError::Malformed => {
                ApiError::BadRequest("Malformed webhook payload".to_string())
            }
            ProcessWebhookError::CorruptRecord(e) => ApiError::Internal(e),
            ProcessWebhookError::Store(e) => ApiError::Internal(e.to_string()),
            ProcessWebhookError::Mail(e) => ApiError::Internal(e.to_string()),
        }
    }
}
