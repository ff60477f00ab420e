//! Telegram adapter - long-polling gateway

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::errors::BotError;
use crate::domain::entities::User;
use crate::domain::traits::{Gateway, GatewayInfo, Inbound};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<UpdateMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpdateMessage {
    from: Option<UpdateUser>,
    chat: UpdateChat,
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UpdateUser {
    id: i64,
    username: Option<String>,
    #[serde(default)]
    is_bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct UpdateChat {
    id: i64,
}

/// Telegram gateway over the HTTP bot API
pub struct TelegramAdapter {
    token: String,
    client: Client,
    poll_timeout_secs: u64,
    offset: AtomicI64,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, poll_timeout_secs: u64) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            poll_timeout_secs,
            offset: AtomicI64::new(0),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Offset acknowledging every update in the batch
    fn next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }

    /// Text messages become inbound events; anything else is dropped
    fn into_inbound(update: Update) -> Option<Inbound> {
        let message = update.message?;
        let text = message.text?;
        let sender = message.from.map(|from| {
            let mut user = User::new(from.id.to_string());
            user.is_bot = from.is_bot;
            match from.username {
                Some(username) => user.with_username(username),
                None => user,
            }
        });
        let inbound = Inbound::new(message.chat.id.to_string(), text);
        Some(match sender {
            Some(user) => inbound.with_sender(user),
            None => inbound,
        })
    }
}

#[async_trait]
impl Gateway for TelegramAdapter {
    async fn connect(&self) -> Result<GatewayInfo, BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: MeResult,
        }

        #[derive(Deserialize)]
        struct MeResult {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if matches!(
            status,
            reqwest::StatusCode::UNAUTHORIZED
                | reqwest::StatusCode::FORBIDDEN
                | reqwest::StatusCode::NOT_FOUND
        ) {
            return Err(BotError::Auth(format!(
                "Telegram rejected the token: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", status)));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(GatewayInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        })
    }

    async fn poll(&self) -> Result<Vec<Inbound>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset: self.offset.load(Ordering::SeqCst),
            timeout: self.poll_timeout_secs,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BotError::Auth(format!(
                "Telegram rejected the token: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", status)));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if let Some(next) = Self::next_offset(&data.result) {
            self.offset.store(next, Ordering::SeqCst);
        }

        Ok(data.result.into_iter().filter_map(Self::into_inbound).collect())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
        }

        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    async fn delete_message(&self, chat_id: &str, message_id: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct DeleteMessageRequest {
            chat_id: String,
            message_id: i64,
        }

        let message_id: i64 = message_id
            .parse()
            .map_err(|_| BotError::Internal(format!("invalid message id: {}", message_id)))?;

        let url = self.api_url("deleteMessage");
        let request = DeleteMessageRequest {
            chat_id: chat_id.to_string(),
            message_id,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Telegram API error: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn close(&self) -> Result<(), BotError> {
        // Long polling holds no server-side session to tear down
        info!("Telegram connection closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_offset_acknowledges_the_whole_batch() {
        let updates: Vec<Update> = serde_json::from_str(
            r#"[{"update_id": 5}, {"update_id": 9}, {"update_id": 7}]"#,
        )
        .unwrap();
        assert_eq!(TelegramAdapter::next_offset(&updates), Some(10));
        assert_eq!(TelegramAdapter::next_offset(&[]), None);
    }

    #[test]
    fn test_into_inbound_maps_text_messages() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 1,
                "message": {
                    "from": {"id": 42, "username": "ada", "is_bot": false},
                    "chat": {"id": -100},
                    "text": ";ping"
                }
            }"#,
        )
        .unwrap();
        let inbound = TelegramAdapter::into_inbound(update).unwrap();
        assert_eq!(inbound.chat_id, "-100");
        assert_eq!(inbound.text, ";ping");
        let sender = inbound.sender.unwrap();
        assert_eq!(sender.id, "42");
        assert_eq!(sender.username.as_deref(), Some("ada"));
    }

    #[test]
    fn test_into_inbound_drops_non_text_updates() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 2, "message": {"chat": {"id": 1}}}"#,
        )
        .unwrap();
        assert!(TelegramAdapter::into_inbound(update).is_none());
        let update: Update = serde_json::from_str(r#"{"update_id": 3}"#).unwrap();
        assert!(TelegramAdapter::into_inbound(update).is_none());
    }

    #[test]
    fn test_api_url_embeds_token_and_method() {
        let adapter = TelegramAdapter::new("123:abc", 30);
        assert_eq!(
            adapter.api_url("getMe"),
            "https://api.telegram.org/bot123:abc/getMe"
        );
    }
}
