use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::User;

/// Gateway trait - abstraction for chat platform connections
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Perform the handshake with the platform and return the bot identity.
    /// A rejected credential surfaces as `BotError::Auth`.
    async fn connect(&self) -> Result<GatewayInfo, BotError>;

    /// Wait for the next batch of inbound events
    async fn poll(&self) -> Result<Vec<Inbound>, BotError>;

    /// Send a message to a chat, returning the platform message id
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Delete a previously sent message
    async fn delete_message(&self, chat_id: &str, message_id: &str) -> Result<(), BotError>;

    /// Terminate the connection gracefully
    async fn close(&self) -> Result<(), BotError>;
}

/// Bot identity as reported by the platform handshake
#[derive(Debug, Clone)]
pub struct GatewayInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// Raw inbound event, unparsed
#[derive(Debug, Clone)]
pub struct Inbound {
    pub chat_id: String,
    pub sender: Option<User>,
    pub text: String,
}

impl Inbound {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender: None,
            text: text.into(),
        }
    }

    pub fn with_sender(mut self, sender: User) -> Self {
        self.sender = Some(sender);
        self
    }
}
