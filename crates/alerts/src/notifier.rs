//! Notification sink abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Why an alert could not be delivered.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
    /// Failure reported by a sink that does not talk to Telegram directly.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Destination for formatted alert messages.
///
/// The destination itself (chat, channel) is fixed when the sink is built.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one formatted message.
    async fn send(&self, message: &str) -> Result<(), AlertError>;
}
