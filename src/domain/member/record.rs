//! Member record aggregate - entitlements derived from payment events.
//!
//! The record is the JSON value persisted under `user:<email>` in the KV
//! store, so serde field names match the stored shape (camelCase).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmailAddress, Timestamp};

/// How a product was purchased at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseMode {
    /// Single payment, entitlement recorded in `products`.
    OneTime,
    /// Recurring billing, entitlement recorded in `subscriptions`.
    Subscription,
}

/// Entitlement record for a single member, keyed by lower-cased email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// Normalized email address, the unique identity key.
    pub email: String,

    /// Set once at first purchase.
    pub created_at: Timestamp,

    /// One-time purchase product identifiers (set semantics).
    #[serde(default)]
    pub products: Vec<String>,

    /// Active subscription product identifiers (set semantics).
    #[serde(default)]
    pub subscriptions: Vec<String>,

    /// Billing cycles paid per subscription product.
    ///
    /// Invariant: holds an entry for every identifier in `subscriptions`,
    /// initialized to 1 on first activation.
    #[serde(default)]
    pub months_active: HashMap<String, u32>,

    /// Payment-provider customer reference, last-write-wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
}

impl MemberRecord {
    /// Creates an empty record for a first-time purchaser.
    pub fn new(email: &EmailAddress, now: Timestamp) -> Self {
        Self {
            email: email.as_str().to_string(),
            created_at: now,
            products: Vec::new(),
            subscriptions: Vec::new(),
            months_active: HashMap::new(),
            stripe_customer_id: None,
        }
    }

    /// Applies a completed checkout to the record.
    ///
    /// Set semantics on both entitlement lists: re-purchasing an already
    /// owned product is a no-op on membership. The provider customer id is
    /// overwritten whenever the checkout carries one.
    pub fn apply_checkout(&mut self, product: &str, mode: PurchaseMode, customer_id: Option<&str>) {
        match mode {
            PurchaseMode::Subscription => {
                if !self.subscriptions.iter().any(|s| s == product) {
                    self.subscriptions.push(product.to_string());
                }
                self.months_active
                    .entry(product.to_string())
                    .or_insert(1);
            }
            PurchaseMode::OneTime => {
                if !self.products.iter().any(|p| p == product) {
                    self.products.push(product.to_string());
                }
            }
        }

        if let Some(customer) = customer_id {
            self.stripe_customer_id = Some(customer.to_string());
        }
    }

    /// Applies a successful recurring invoice.
    ///
    /// Every active subscription gets its paid-cycle counter incremented.
    /// An absent counter defaults to 1 before incrementing, so the minimum
    /// resulting value is 2.
    pub fn apply_invoice_paid(&mut self) {
        for sub in &self.subscriptions {
            let months = self.months_active.get(sub).copied().unwrap_or(1);
            self.months_active.insert(sub.clone(), months + 1);
        }
    }
}
