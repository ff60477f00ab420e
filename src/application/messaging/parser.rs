//! Message parser - Turns raw inbound events into structured messages

use crate::domain::entities::{Content, Message, User};
use crate::domain::traits::Inbound;

/// Parses inbound events against a configured command prefix
pub struct MessageParser {
    prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse a raw gateway event
    pub fn parse(&self, inbound: Inbound) -> Message {
        self.parse_text(inbound.chat_id, inbound.text, inbound.sender)
    }

    /// Parse a text line from a chat
    pub fn parse_text(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
    ) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        let content = match text.strip_prefix(&self.prefix) {
            Some(rest) => self.parse_command(rest, &text),
            None => Content::Text(text),
        };
        let message = Message::new(chat_id, content);
        match sender {
            Some(user) => message.with_sender(user),
            None => message,
        }
    }

    /// Split the body after the prefix into command name and arguments.
    /// A bare or blank prefix line is ordinary text, not a command.
    fn parse_command(&self, body: &str, original: &str) -> Content {
        let mut parts = body.split_whitespace();
        match parts.next() {
            Some(name) => Content::Command {
                name: name.to_string(),
                args: parts.map(str::to_string).collect(),
            },
            None => Content::Text(original.to_string()),
        }
    }
}
