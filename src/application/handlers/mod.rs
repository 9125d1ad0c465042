//! Operation handlers, one per inbound boundary operation.

mod get_member;
mod logout;
mod process_webhook;
mod request_login;
mod verify_token;

pub use get_member::{
    GetMemberCommand, GetMemberError, GetMemberHandler, GetMemberOutcome, UnauthenticatedReason,
};
pub use logout::{LogoutCommand, LogoutError, LogoutHandler};
pub use process_webhook::{
    ProcessWebhookCommand, ProcessWebhookError, ProcessWebhookHandler, ProcessWebhookOutcome,
};
pub use request_login::{RequestLoginCommand, RequestLoginError, RequestLoginHandler};
pub use verify_token::{
    VerifyTokenCommand, VerifyTokenError, VerifyTokenHandler, VerifyTokenOutcome,
};
