//! ProcessWebhookHandler - verify, parse, and apply payment events.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::application::magic_link::MagicLinkSender;
use crate::domain::foundation::{EmailAddress, Timestamp};
use crate::domain::member::MemberRecord;
use crate::domain::webhook::{verify_signature, PaymentEvent};
use crate::ports::{user_key, KvError, KvStore, MailError};

/// Command carrying a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw request body, byte-exact as received.
    pub payload: Vec<u8>,
    /// The signature header, if present.
    pub signature: Option<String>,
}

/// How a verified delivery was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessWebhookOutcome {
    /// Event mutated state (and possibly sent mail).
    Applied,
    /// Event was relevant but unusable, typically a missing email.
    /// Acknowledged so the provider does not redeliver it.
    Dropped,
    /// Event kind carries no side effects here.
    Ignored,
}

/// Errors surfaced to the webhook endpoint.
///
/// Store and mail failures are deliberately propagated: a non-2xx
/// response makes the provider redeliver, which is the retry mechanism
/// for transient outages.
#[derive(Debug, Error)]
pub enum ProcessWebhookError {
    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Malformed webhook payload")]
    Malformed,

    /// Stored member record failed to decode. Permanent, unlike a store
    /// outage; logged distinctly so redeliveries are recognizable.
    #[error("Corrupt member record: {0}")]
    CorruptRecord(String),

    #[error(transparent)]
    Store(#[from] KvError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Orchestrates the webhook pipeline: signature check, event parse,
/// record mutation, welcome-link dispatch.
pub struct ProcessWebhookHandler {
    users: Arc<dyn KvStore>,
    magic_link: MagicLinkSender,
    webhook_secret: SecretString,
}

impl ProcessWebhookHandler {
    pub fn new(
        users: Arc<dyn KvStore>,
        magic_link: MagicLinkSender,
        webhook_secret: SecretString,
    ) -> Self {
        Self {
            users,
            magic_link,
            webhook_secret,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<ProcessWebhookOutcome, ProcessWebhookError> {
        let Some(header) = cmd.signature.as_deref() else {
            tracing::warn!("Webhook delivery without signature header");
            return Err(ProcessWebhookError::InvalidSignature);
        };
        if !verify_signature(&cmd.payload, header, self.webhook_secret.expose_secret()) {
            tracing::warn!("Webhook signature verification failed");
            return Err(ProcessWebhookError::InvalidSignature);
        }

        let event = PaymentEvent::parse(&cmd.payload).map_err(|err| {
            tracing::warn!(error = %err, "Signed webhook with malformed payload");
            ProcessWebhookError::Malformed
        })?;

        match event {
            PaymentEvent::CheckoutCompleted {
                email,
                product,
                mode,
                customer_id,
            } => {
                let Some(raw_email) = email else {
                    tracing::warn!("Checkout completed without a customer email, dropped");
                    return Ok(ProcessWebhookOutcome::Dropped);
                };
                let Ok(email) = EmailAddress::parse(&raw_email) else {
                    tracing::warn!("Checkout completed with unusable email, dropped");
                    return Ok(ProcessWebhookOutcome::Dropped);
                };

                let key = user_key(email.as_str());
                let mut record = match self.users.get(&key).await? {
                    Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                        tracing::error!(email = %email, error = %e, "Stored member record is corrupt");
                        ProcessWebhookError::CorruptRecord(e.to_string())
                    })?,
                    None => MemberRecord::new(&email, Timestamp::now()),
                };
                record.apply_checkout(&product, mode, customer_id.as_deref());

                let value = serde_json::to_string(&record)
                    .map_err(|e| KvError::Unavailable(format!("Failed to encode record: {}", e)))?;
                self.users.put(&key, &value, None).await?;

                tracing::info!(email = %email, product = %product, "Checkout applied");

                // Welcome mail failing must bounce the delivery so the
                // provider retries; the record write above is idempotent.
                self.magic_link.issue_and_send(&email, true).await.map_err(
                    |err| match err {
                        crate::application::magic_link::MagicLinkError::Store(e) => {
                            ProcessWebhookError::Store(e)
                        }
                        crate::application::magic_link::MagicLinkError::Mail(e) => {
                            ProcessWebhookError::Mail(e)
                        }
                    },
                )?;

                Ok(ProcessWebhookOutcome::Applied)
            }

            PaymentEvent::InvoicePaymentSucceeded { email } => {
                let Some(raw_email) = email else {
                    tracing::warn!("Invoice payment without a customer email, dropped");
                    return Ok(ProcessWebhookOutcome::Dropped);
                };
                let Ok(email) = EmailAddress::parse(&raw_email) else {
                    tracing::warn!("Invoice payment with unusable email, dropped");
                    return Ok(ProcessWebhookOutcome::Dropped);
                };

                let key = user_key(email.as_str());
                let Some(raw) = self.users.get(&key).await? else {
                    tracing::info!(email = %email, "Invoice for unknown member, dropped");
                    return Ok(ProcessWebhookOutcome::Dropped);
                };
                let mut record: MemberRecord = serde_json::from_str(&raw).map_err(|e| {
                    tracing::error!(email = %email, error = %e, "Stored member record is corrupt");
                    ProcessWebhookError::CorruptRecord(e.to_string())
                })?;

                record.apply_invoice_paid();

                let value = serde_json::to_string(&record)
                    .map_err(|e| KvError::Unavailable(format!("Failed to encode record: {}", e)))?;
                self.users.put(&key, &value, None).await?;

                tracing::info!(email = %email, "Invoice payment applied");
                Ok(ProcessWebhookOutcome::Applied)
            }

            PaymentEvent::SubscriptionDeleted { subscription_id } => {
                // Entitlements outlive cancellation; this is an audit trail only.
                tracing::info!(subscription_id = %subscription_id, "Subscription cancelled");
                Ok(ProcessWebhookOutcome::Ignored)
            }

            PaymentEvent::Unrecognized { kind } => {
                tracing::debug!(kind = %kind, "Unhandled webhook event kind");
                Ok(ProcessWebhookOutcome::Ignored)
            }
        }
    }
}
