//! src/email_client.rs

use crate::domain::SubscriberEmail;
use crate::notifier::{Channel, DeliveryError};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Client of a Resend-style email API.
#[derive(Debug, Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    recipient: SubscriberEmail,
    api_key: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: String,
        recipient: SubscriberEmail,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            sender,
            recipient,
            api_key,
        })
    }

    pub fn recipient(&self) -> &SubscriberEmail {
        &self.recipient
    }

    /// Send one HTML email to the configured recipient.
    pub async fn send_email(&self, subject: &str, html_content: &str) -> Result<(), DeliveryError> {
        let url = format!("{}/emails", self.base_url);
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: [self.recipient.as_ref()],
            subject,
            html: html_content,
        };
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(Channel::Email, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // best effort, the status alone already marks the failure
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            channel: Channel::Email,
            status,
            body,
        })
    }
}
