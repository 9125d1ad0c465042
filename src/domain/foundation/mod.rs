//! Shared value objects for the domain layer.

mod email;
mod errors;
mod hex;
mod timestamp;

pub use email::EmailAddress;
pub use errors::ValidationError;
pub use hex::{hex_decode, hex_encode};
pub use timestamp::Timestamp;
