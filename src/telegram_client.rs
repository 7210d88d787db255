//! src/telegram_client.rs

use crate::notifier::{Channel, DeliveryError};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Destination of bot messages: numeric chat id or public `@channelname`.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        match value.trim().parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Username(value),
        }
    }
}

#[derive(serde::Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
}

/// Client of the Telegram bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http_client: Client,
    base_url: String,
    bot_token: Secret<String>,
    chat_id: ChatId,
    fetch_updates: bool,
}

impl TelegramClient {
    pub fn new(
        base_url: String,
        bot_token: Secret<String>,
        chat_id: ChatId,
        timeout: Duration,
        fetch_updates: bool,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            bot_token,
            chat_id,
            fetch_updates,
        })
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.bot_token.expose_secret(),
            method
        )
    }

    /// Send `text` to the configured chat and return the API's reply.
    pub async fn send_message(&self, text: &str) -> Result<serde_json::Value, DeliveryError> {
        if self.fetch_updates {
            self.log_recent_updates().await;
        }

        let request_body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };
        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&request_body)
            .send()
            .await
            // the request url carries the bot token
            .map_err(|e| DeliveryError::Transport(Channel::Chat, e.without_url()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                channel: Channel::Chat,
                status,
                body,
            });
        }
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    /// Read what the bot has received lately, e.g. to find the right chat id.
    pub async fn get_updates(&self) -> Result<serde_json::Value, reqwest::Error> {
        self.http_client
            .get(self.method_url("getUpdates"))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
    }

    #[tracing::instrument(name = "Fetch recent bot updates", skip(self))]
    async fn log_recent_updates(&self) {
        match self.get_updates().await {
            Ok(updates) => tracing::debug!(bot_updates = %updates, "Received bot updates"),
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Could not fetch bot updates"
            ),
        }
    }
}
