//! Telegram delivery for alerts.

use crate::notifier::{AlertError, AlertSink};
use async_trait::async_trait;
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};
use tracing::debug;

/// Resolve a configured chat identifier into a Telegram recipient.
///
/// Numeric ids (including negative group ids) address a chat directly;
/// anything else is treated as a public channel username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat_id.starts_with('@') => Recipient::ChannelUsername(chat_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", chat_id)),
    }
}

/// Telegram bot wrapper bound to a single destination chat.
pub struct TelegramBot {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramBot {
    /// Create a new bot with the given token, sending to `chat_id`.
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id),
        }
    }

    /// Send an HTML alert message to the configured chat.
    pub async fn send_alert(&self, message: &str) -> Result<(), AlertError> {
        self.bot
            .send_message(self.recipient.clone(), message)
            .parse_mode(ParseMode::Html)
            .await?;
        debug!("Telegram alert delivered ({} chars)", message.len());
        Ok(())
    }
}

impl fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramBot")
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AlertSink for TelegramBot {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.send_alert(message).await
    }
}
