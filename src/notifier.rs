//! src/notifier.rs

use crate::domain::SignupEvent;
use crate::email_client::EmailClient;
use crate::telegram_client::TelegramClient;
use reqwest::StatusCode;

/// Downstream notification target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Chat,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Email => write!(f, "email"),
            Channel::Chat => write!(f, "chat"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to reach the {0} API")]
    Transport(Channel, #[source] reqwest::Error),
    #[error("The {channel} API responded with {status}: {body}")]
    Rejected {
        channel: Channel,
        status: StatusCode,
        body: String,
    },
}

impl DeliveryError {
    pub fn channel(&self) -> Channel {
        match self {
            DeliveryError::Transport(channel, _) => *channel,
            DeliveryError::Rejected { channel, .. } => *channel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutcome {
    Delivered,
    /// Credentials for the channel are not configured.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupReport {
    pub email: ChannelOutcome,
    pub chat: ChannelOutcome,
}

/// Forwards beta signups to the operator's inbox and chat.
#[derive(Debug, Clone)]
pub struct SignupNotifier {
    email_client: Option<EmailClient>,
    telegram_client: Option<TelegramClient>,
    product_name: String,
}

impl SignupNotifier {
    pub fn new(
        email_client: Option<EmailClient>,
        telegram_client: Option<TelegramClient>,
        product_name: String,
    ) -> Self {
        Self {
            email_client,
            telegram_client,
            product_name,
        }
    }

    pub fn email_subject(&self) -> String {
        format!("New {} Beta Signup", self.product_name)
    }

    pub fn email_html(&self, event: &SignupEvent) -> String {
        format!(
            "<h2>New Beta Signup</h2>\
            <p>Someone just signed up for the {} beta:</p>\
            <p><strong>Email:</strong> {}</p>\
            <p><strong>Signed up at:</strong> {}</p>",
            htmlescape::encode_minimal(&self.product_name),
            htmlescape::encode_minimal(event.email.as_ref()),
            event.signed_up_at_display()
        )
    }

    pub fn chat_text(&self, event: &SignupEvent) -> String {
        format!(
            "🚀 New {} Beta Signup!\n\n📧 Email: {}\n⏰ Time: {}",
            self.product_name,
            event.email,
            event.signed_up_at_display()
        )
    }

    #[tracing::instrument(name = "Notify operator by email", skip_all)]
    pub async fn notify_email(&self, event: &SignupEvent) -> Result<ChannelOutcome, DeliveryError> {
        let Some(email_client) = &self.email_client else {
            tracing::warn!("Email credentials not configured");
            return Ok(ChannelOutcome::Skipped);
        };
        email_client
            .send_email(&self.email_subject(), &self.email_html(event))
            .await?;
        Ok(ChannelOutcome::Delivered)
    }

    #[tracing::instrument(name = "Notify operator by chat message", skip_all)]
    pub async fn notify_chat(&self, event: &SignupEvent) -> Result<ChannelOutcome, DeliveryError> {
        let Some(telegram_client) = &self.telegram_client else {
            tracing::warn!("Telegram credentials not configured");
            return Ok(ChannelOutcome::Skipped);
        };
        let reply = telegram_client.send_message(&self.chat_text(event)).await?;
        tracing::debug!(telegram_reply = %reply, "Telegram message sent");
        Ok(ChannelOutcome::Delivered)
    }

    /// Notify both channels, email first. The first failure ends the run.
    #[tracing::instrument(
        name = "Handle beta signup",
        skip_all,
        fields(subscriber_email = %event.email)
    )]
    pub async fn handle_signup(&self, event: &SignupEvent) -> Result<SignupReport, DeliveryError> {
        let email = self
            .notify_email(event)
            .await
            .inspect(|outcome| log_outcome(Channel::Email, outcome))
            .inspect_err(log_failure)?;
        let chat = self
            .notify_chat(event)
            .await
            .inspect(|outcome| log_outcome(Channel::Chat, outcome))
            .inspect_err(log_failure)?;
        Ok(SignupReport { email, chat })
    }
}

fn log_outcome(channel: Channel, outcome: &ChannelOutcome) {
    tracing::info!(%channel, outcome = ?outcome, "Channel notified");
}

fn log_failure(e: &DeliveryError) {
    tracing::error!(
        channel = %e.channel(),
        error.cause_chain = ?e,
        error.message = %e,
        "Channel delivery failed"
    );
}
