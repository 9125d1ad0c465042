//! Payment provider configuration (Stripe webhooks)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration.
///
/// Only the webhook side of the provider is used: inbound event
/// authenticity is checked against the shared signing secret.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Webhook signing secret (whsec_...)
    pub stripe_webhook_secret: SecretString,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.stripe_webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if !secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        Ok(())
    }
}
