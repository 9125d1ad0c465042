//! Email address value object.
//!
//! The lower-cased address is the sole identity key for members, so all
//! code paths normalize through this type before touching the KV store.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

/// A normalized (trimmed, lower-cased) email address.
///
/// Validation is deliberately shallow: the boundary contract only requires
/// the presence of an `@`. Deliverability is the email provider's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an email address.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !normalized.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing '@'"));
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases_and_trims() {
        let email = EmailAddress::parse("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
    }

    #[test]
    fn parse_rejects_missing_at() {
        assert!(EmailAddress::parse("not-an-email").is_err());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(EmailAddress::parse("   ").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let email = EmailAddress::parse("a@b.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@b.com\"");
    }
}
