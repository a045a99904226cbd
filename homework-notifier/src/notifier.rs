//! Message delivery to the single configured recipient
//!
//! Delivery is best effort: one attempt per message, failures are logged
//! and never reach the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::PollError;

/// Outbound-only chat transport
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), PollError>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope of every Bot API answer
#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<String>,
}

/// Telegram Bot API client, built once and reused by every cycle
pub struct TelegramBot {
    http: reqwest::Client,
    send_url: String,
}

impl TelegramBot {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        let base = config.telegram_api_url.trim_end_matches('/');
        Self {
            http,
            send_url: format!("{}/bot{}/sendMessage", base, config.telegram_token),
        }
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), PollError> {
        let response = self
            .http
            .post(&self.send_url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            // The URL embeds the bot token
            .map_err(|e| PollError::DeliveryFailed(e.without_url().to_string()))?;

        let status = response.status();
        let reply = response.json::<BotApiReply>().await.ok();
        match reply {
            Some(reply) if status.is_success() && reply.ok => Ok(()),
            Some(BotApiReply { description: Some(description), .. }) => {
                Err(PollError::DeliveryFailed(format!("{status}: {description}")))
            }
            _ => Err(PollError::DeliveryFailed(format!("Bot API answered {status}"))),
        }
    }
}

/// Sends notifications to one recipient and contains every delivery failure
pub struct Notifier<M> {
    messenger: M,
    recipient: String,
}

impl<M: Messenger> Notifier<M> {
    pub fn new(messenger: M, recipient: impl Into<String>) -> Self {
        Self {
            messenger,
            recipient: recipient.into(),
        }
    }

    /// Returns whether the message went out; a failure is only logged.
    pub async fn notify(&self, text: &str) -> bool {
        match self.messenger.send_message(&self.recipient, text).await {
            Ok(()) => {
                debug!("Message delivered to chat {}", self.recipient);
                true
            }
            Err(e) => {
                error!("Failed to deliver message to chat {}: {}", self.recipient, e);
                false
            }
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }
}
