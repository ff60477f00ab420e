//! Console adapter for development/testing

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;

use crate::application::errors::BotError;
use crate::domain::entities::User;
use crate::domain::traits::{Gateway, GatewayInfo, Inbound};

/// Chat and user id of the local console session
const CONSOLE_ID: &str = "console";

/// Gateway reading stdin lines, for running without a token
pub struct ConsoleAdapter {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    next_message_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            next_message_id: AtomicU64::new(1),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn connect(&self) -> Result<GatewayInfo, BotError> {
        info!("Console mode: type messages below, Ctrl-D to quit");
        Ok(GatewayInfo {
            id: CONSOLE_ID.to_string(),
            name: "warden-bot".to_string(),
            username: CONSOLE_ID.to_string(),
        })
    }

    async fn poll(&self) -> Result<Vec<Inbound>, BotError> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![
                    Inbound::new(CONSOLE_ID, line).with_sender(User::new(CONSOLE_ID))
                ])
            }
            Ok(None) => Err(BotError::Closed),
            Err(e) => Err(BotError::Internal(e.to_string())),
        }
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok(self
            .next_message_id
            .fetch_add(1, Ordering::SeqCst)
            .to_string())
    }

    async fn delete_message(&self, _chat_id: &str, message_id: &str) -> Result<(), BotError> {
        println!("[BOT] (message {} deleted)", message_id);
        Ok(())
    }

    async fn close(&self) -> Result<(), BotError> {
        info!("Console session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_ids_are_sequential() {
        let adapter = ConsoleAdapter::new();
        let first = adapter.send_message("console", "one").await.unwrap();
        let second = adapter.send_message("console", "two").await.unwrap();
        assert_eq!(first, "1");
        assert_eq!(second, "2");
        adapter.delete_message("console", &first).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_reports_console_identity() {
        let adapter = ConsoleAdapter::new();
        let info = adapter.connect().await.unwrap();
        assert_eq!(info.id, "console");
        assert_eq!(info.username, "console");
    }
}
