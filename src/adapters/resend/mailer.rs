//! Resend-backed mailer for magic-link delivery.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::foundation::EmailAddress;
use crate::ports::{MailError, Mailer};

const RESEND_API_URL: &str = "https://api.resend.com";

/// Sends magic-link emails through the Resend HTTP API.
pub struct ResendMailer {
    config: EmailConfig,
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
}

impl ResendMailer {
    /// Creates a mailer for the given email configuration.
    pub fn new(config: EmailConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.send_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            client,
            base_url: RESEND_API_URL.to_string(),
        }
    }

    /// Overrides the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn subject(new_user: bool) -> &'static str {
        if new_user {
            "Welcome! Here's your sign-in link"
        } else {
            "Your sign-in link"
        }
    }

    fn body_html(link: &str, new_user: bool) -> String {
        let lead = if new_user {
            "Thanks for your purchase! Your member account is ready."
        } else {
            "Here's the sign-in link you requested."
        };
        format!(
            "<p>{}</p>\
             <p><a href=\"{}\">Sign in to your account</a></p>\
             <p>This link works once and expires in 30 minutes. \
             If you didn't request it, you can ignore this email.</p>",
            lead, link
        )
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_magic_link(
        &self,
        to: &EmailAddress,
        link: &str,
        new_user: bool,
    ) -> Result<(), MailError> {
        let request = SendEmailRequest {
            from: self.config.from_header(),
            to: [to.as_str()],
            subject: Self::subject(new_user),
            html: Self::body_html(link, new_user),
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(self.config.resend_api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "Resend rejected the email");
            return Err(MailError::Provider(format!(
                "Resend returned {}: {}",
                status, body
            )));
        }

        tracing::debug!(to = %to, new_user, "Email accepted by Resend");
        Ok(())
    }
}
