//! Webhook authenticity and event parsing.

mod event;
mod signature;

pub use event::{EventParseError, PaymentEvent};
pub use signature::{verify_signature, SignatureHeader, SignatureParseError};
