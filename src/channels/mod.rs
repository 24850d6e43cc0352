//! Channel abstraction for message I/O.

pub mod cli;
pub mod telegram;

pub use cli::CliChannel;
pub use telegram::TelegramChannel;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

/// A message arriving from a chat transport.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Channel the message arrived on (`"telegram"`, `"cli"`).
    pub channel: String,
    /// Stable numeric identity of the sender.
    pub user_id: i64,
    /// Raw message text.
    pub text: String,
    /// Channel-specific routing data (e.g. Telegram chat_id).
    pub metadata: serde_json::Value,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: i64, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user_id,
            text: text.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether the message is the survey reset command.
    pub fn is_start_command(&self) -> bool {
        let trimmed = self.text.trim();
        trimmed == "/start" || trimmed.starts_with("/start ") || trimmed.starts_with("/start@")
    }

    /// Whether the message is any bot command (leading `/`). Commands
    /// other than /start are never survey answers.
    pub fn is_command(&self) -> bool {
        self.text.trim_start().starts_with('/')
    }
}

/// A reply to send back through a channel.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Progress signals emitted while a reply is being produced.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    /// The bot is waiting on the inference provider.
    Thinking(String),
}

/// Stream of incoming messages produced by a channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A chat transport the bot can listen on and reply through.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Start listening and return the stream of incoming messages.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send a reply for a previously received message.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Surface a progress signal (typing indicator etc.). Best effort.
    async fn send_status(
        &self,
        msg: &IncomingMessage,
        status: StatusUpdate,
    ) -> Result<(), ChannelError>;

    /// Verify the channel can reach its transport.
    async fn health_check(&self) -> Result<(), ChannelError>;

    /// Release any resources before shutdown.
    async fn shutdown(&self) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_detection() {
        assert!(IncomingMessage::new("cli", 1, "/start").is_start_command());
        assert!(IncomingMessage::new("cli", 1, "  /start  ").is_start_command());
        assert!(IncomingMessage::new("cli", 1, "/start@persona_bot").is_start_command());
        assert!(!IncomingMessage::new("cli", 1, "/started").is_start_command());
        assert!(!IncomingMessage::new("cli", 1, "hello").is_start_command());
    }

    #[test]
    fn command_detection() {
        assert!(IncomingMessage::new("cli", 1, "/help").is_command());
        assert!(IncomingMessage::new("cli", 1, "/start").is_command());
        assert!(IncomingMessage::new("cli", 1, "  /stop").is_command());
        assert!(!IncomingMessage::new("cli", 1, "hello /help").is_command());
        assert!(!IncomingMessage::new("cli", 1, "plain answer").is_command());
    }

    #[test]
    fn metadata_defaults_to_null() {
        let msg = IncomingMessage::new("telegram", 42, "hi");
        assert!(msg.metadata.is_null());

        let msg = msg.with_metadata(serde_json::json!({"chat_id": "99"}));
        assert_eq!(msg.metadata["chat_id"], "99");
    }
}
