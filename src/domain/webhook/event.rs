//! Payment provider webhook events.
//!
//! Inbound payloads are modeled as a closed tagged union over the event
//! kinds this system reacts to, with an explicit `Unrecognized` variant
//! rather than an open-ended chain of string comparisons.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::member::PurchaseMode;

/// Error parsing a webhook payload.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("Invalid webhook JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A payment event this system knows how to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    /// `checkout.session.completed` - a purchase finished.
    CheckoutCompleted {
        /// Buyer email; events without one are dropped downstream.
        email: Option<String>,
        /// Product identifier from checkout metadata.
        product: String,
        /// One-time purchase or recurring subscription.
        mode: PurchaseMode,
        /// Provider customer reference.
        customer_id: Option<String>,
    },

    /// `invoice.payment_succeeded` - a recurring billing cycle was paid.
    InvoicePaymentSucceeded {
        /// Customer email; unknown emails are a silent no-op downstream.
        email: Option<String>,
    },

    /// `customer.subscription.deleted` - logged only; entitlements are not
    /// revoked automatically.
    SubscriptionDeleted { subscription_id: String },

    /// Any other event kind: acknowledged and ignored.
    Unrecognized { kind: String },
}

/// Raw webhook envelope as delivered by the provider.
#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(default = "empty_object")]
    object: serde_json::Value,
}

impl Default for EventData {
    fn default() -> Self {
        Self {
            object: empty_object(),
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Checkout session object as it arrives in webhook payloads.
#[derive(Debug, Deserialize)]
struct CheckoutObject {
    #[serde(default)]
    customer_details: Option<CustomerDetails>,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    mode: String,
    #[serde(default)]
    customer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerDetails {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InvoiceObject {
    #[serde(default)]
    customer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    #[serde(default)]
    id: String,
}

impl PaymentEvent {
    /// Parses a raw webhook body into the closed event union.
    ///
    /// Missing fields degrade to `None`/defaults so that the drop
    /// decisions stay in the orchestration layer, where they are logged.
    pub fn parse(payload: &[u8]) -> Result<Self, EventParseError> {
        let envelope: EventEnvelope = serde_json::from_slice(payload)?;

        let event = match envelope.event_type.as_str() {
            "checkout.session.completed" => {
                let object: CheckoutObject = serde_json::from_value(envelope.data.object)?;
                let mode = if object.mode == "subscription" {
                    PurchaseMode::Subscription
                } else {
                    PurchaseMode::OneTime
                };
                PaymentEvent::CheckoutCompleted {
                    email: object.customer_details.and_then(|d| d.email),
                    product: object
                        .metadata
                        .get("product_name")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    mode,
                    customer_id: object.customer,
                }
            }
            "invoice.payment_succeeded" => {
                let object: InvoiceObject = serde_json::from_value(envelope.data.object)?;
                PaymentEvent::InvoicePaymentSucceeded {
                    email: object.customer_email,
                }
            }
            "customer.subscription.deleted" => {
                let object: SubscriptionObject = serde_json::from_value(envelope.data.object)?;
                PaymentEvent::SubscriptionDeleted {
                    subscription_id: object.id,
                }
            }
            other => PaymentEvent::Unrecognized {
                kind: other.to_string(),
            },
        };

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_subscription_checkout() {
        let payload = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test",
                    "mode": "subscription",
                    "customer": "cus_42",
                    "customer_details": {"email": "Member@Example.com"},
                    "metadata": {"product_name": "planA"}
                }
            }
        }"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        assert_eq!(
            event,
            PaymentEvent::CheckoutCompleted {
                email: Some("Member@Example.com".to_string()),
                product: "planA".to_string(),
                mode: PurchaseMode::Subscription,
                customer_id: Some("cus_42".to_string()),
            }
        );
    }

    #[test]
    fn parse_one_time_checkout_defaults_product() {
        let payload = r#"{
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "mode": "payment",
                    "customer_details": {"email": "a@b.com"}
                }
            }
        }"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        match event {
            PaymentEvent::CheckoutCompleted { product, mode, .. } => {
                assert_eq!(product, "unknown");
                assert_eq!(mode, PurchaseMode::OneTime);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parse_checkout_without_email() {
        let payload = r#"{
            "type": "checkout.session.completed",
            "data": {"object": {"mode": "subscription"}}
        }"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        match event {
            PaymentEvent::CheckoutCompleted { email, .. } => assert!(email.is_none()),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn parse_invoice_payment_succeeded() {
        let payload = r#"{
            "type": "invoice.payment_succeeded",
            "data": {"object": {"customer_email": "a@b.com"}}
        }"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        assert_eq!(
            event,
            PaymentEvent::InvoicePaymentSucceeded {
                email: Some("a@b.com".to_string())
            }
        );
    }

    #[test]
    fn parse_subscription_deleted() {
        let payload = r#"{
            "type": "customer.subscription.deleted",
            "data": {"object": {"id": "sub_9"}}
        }"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        assert_eq!(
            event,
            PaymentEvent::SubscriptionDeleted {
                subscription_id: "sub_9".to_string()
            }
        );
    }

    #[test]
    fn parse_unrecognized_kind() {
        let payload = r#"{"type": "some.future.event", "data": {"object": {}}}"#;

        let event = PaymentEvent::parse(payload.as_bytes()).unwrap();
        assert_eq!(
            event,
            PaymentEvent::Unrecognized {
                kind: "some.future.event".to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(PaymentEvent::parse(b"not json").is_err());
    }
}
