//! Token and session lifecycle domain.

mod session;
mod token;

pub use session::{Session, SESSION_TTL_SECS};
pub use token::{LoginToken, TOKEN_TTL_SECS};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::foundation::hex_encode;

/// Generates a 256-bit cryptographically random opaque identifier,
/// hex-encoded (64 characters).
///
/// Collisions are not re-checked; at 256 bits the probability is
/// negligible.
pub fn opaque_id() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_id_is_64_hex_chars() {
        let id = opaque_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn opaque_ids_are_unique() {
        assert_ne!(opaque_id(), opaque_id());
    }
}
