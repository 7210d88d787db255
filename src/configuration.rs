//! src/configuration.rs

use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::telegram_client::{ChatId, TelegramClient};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub telegram: TelegramSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Name used in notification subjects and messages.
    pub product_name: String,
}

/// Email channel. Without `api_key` and `recipient` the channel is disabled.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub recipient: Option<String>,
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Build the email client, `None` if credentials are missing.
    pub fn client(&self) -> anyhow::Result<Option<EmailClient>> {
        let (Some(api_key), Some(recipient)) = (
            non_empty_secret(&self.api_key),
            non_empty(&self.recipient),
        ) else {
            return Ok(None);
        };
        let recipient = SubscriberEmail::parse(recipient.to_owned())
            .context("Invalid recipient address for the email channel.")?;
        let client = EmailClient::new(
            self.base_url.clone(),
            self.sender.clone(),
            recipient,
            api_key.clone(),
            self.timeout(),
        )
        .context("Failed to build the http client for the email channel.")?;
        Ok(Some(client))
    }
}

/// Chat channel. Without `bot_token` and `chat_id` the channel is disabled.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct TelegramSettings {
    pub base_url: String,
    pub bot_token: Option<Secret<String>>,
    pub chat_id: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    /// Call `getUpdates` before each message and log the result.
    #[serde(default)]
    pub fetch_updates: bool,
}

impl TelegramSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Build the bot client, `None` if credentials are missing.
    pub fn client(&self) -> anyhow::Result<Option<TelegramClient>> {
        let (Some(bot_token), Some(chat_id)) = (
            non_empty_secret(&self.bot_token),
            non_empty(&self.chat_id),
        ) else {
            return Ok(None);
        };
        let client = TelegramClient::new(
            self.base_url.clone(),
            bot_token.clone(),
            ChatId::from(chat_id.to_owned()),
            self.timeout(),
            self.fetch_updates,
        )
        .context("Failed to build the http client for the chat channel.")?;
        Ok(Some(client))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty_secret(value: &Option<Secret<String>>) -> Option<&Secret<String>> {
    value
        .as_ref()
        .filter(|v| !v.expose_secret().trim().is_empty())
}

/// The possible runtime environment for our application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // Add in settings from environment variables (with a prefix of APP and '__' as separator)
        // E.g. `APP_TELEGRAM__CHAT_ID=-100123` would set `Settings.telegram.chat_id`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
