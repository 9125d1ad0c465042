//! Webhook signature verification (HMAC-SHA256).
//!
//! The provider signs `{timestamp}.{raw body}` with a shared secret and
//! presents the result in a `t=...,v1=...` header. Verification fails
//! closed: any parse or decode problem yields `false`, never an error.
//!
//! Timestamp freshness is deliberately not enforced; the replay window is
//! an accepted limitation of the boundary contract.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::hex_decode;

type HmacSha256 = Hmac<Sha256>;

/// Error parsing the signature header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureParseError {
    #[error("Missing signature header")]
    MissingHeader,
    #[error("Missing timestamp (t=) in signature")]
    MissingTimestamp,
    #[error("Missing v1 signature in header")]
    MissingV1Signature,
    #[error("Invalid timestamp format")]
    InvalidTimestamp,
    #[error("Invalid signature format (not valid hex)")]
    InvalidSignatureFormat,
}

/// Parsed signature header components.
///
/// The header format is: `t=<timestamp>,v1=<hex signature>`; unknown keys
/// are ignored for forward compatibility.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    /// Unix timestamp the provider signed along with the body.
    pub timestamp: i64,

    /// HMAC-SHA256 signature, decoded from hex.
    pub v1_signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parse a signature header into components.
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signature = Some(
                        hex_decode(value.trim())
                            .ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        Ok(Self {
            timestamp: timestamp.ok_or(SignatureParseError::MissingTimestamp)?,
            v1_signature: v1_signature.ok_or(SignatureParseError::MissingV1Signature)?,
        })
    }
}

/// Verifies a raw webhook body against its signature header.
///
/// Recomputes HMAC-SHA256 over `{t}.{body}` with the shared secret and
/// compares constant-time against the presented `v1` value.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> bool {
    let parsed = match SignatureHeader::parse(header) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to parse webhook signature header");
            return false;
        }
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        // HMAC accepts keys of any size; unreachable in practice
        return false;
    };
    // MAC over the raw bytes; the body is never assumed to be UTF-8.
    mac.update(parsed.timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    expected.as_slice().ct_eq(&parsed.v1_signature).into()
}
