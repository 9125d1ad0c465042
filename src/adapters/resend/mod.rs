//! Resend adapter for the mailer port.

mod mailer;

pub use mailer::ResendMailer;
