//! Telegram alert delivery for the Heska agent.
//!
//! This crate provides:
//! - The `AlertSink` capability the agent loop sends through
//! - Telegram bot integration for notifications
//! - Alert message formatting

pub mod message;
pub mod notifier;
pub mod telegram;

pub use message::*;
pub use notifier::{AlertError, AlertSink};
pub use telegram::{parse_recipient, TelegramBot};
