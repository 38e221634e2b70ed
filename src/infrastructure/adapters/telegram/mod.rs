//! Telegram adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities;
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram caps message text at 4096 characters
const MAX_MESSAGE_CHARS: usize = 4096;

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// `{ ok, result, description }` wrapper around every Bot API reply
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl Message {
    /// Convert to a domain message. `None` for updates without text.
    pub fn to_domain(&self, parser: &MessageParser) -> Option<entities::Message> {
        let text = self.text.as_deref()?;

        let sender = self.from.as_ref().map(|u| {
            let mut user = entities::User::new(u.id);
            user.username = u.username.clone();
            user.first_name = u.first_name.clone();
            user.is_bot = u.is_bot;
            user
        });

        let mut msg = parser
            .parse(self.chat.id.to_string(), text, sender)
            .with_platform("telegram");
        if let Some(ts) = DateTime::<Utc>::from_timestamp(self.date, 0) {
            msg = msg.with_timestamp(ts);
        }
        Some(msg)
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                username: name.to_lowercase(),
                name,
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a Bot API method and unwrap its `result`.
    ///
    /// Telegram answers failures with `ok: false` and a `description`, often
    /// alongside a non-2xx status, so the envelope is decoded either way.
    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e)))?;

        match envelope.result {
            Some(result) if envelope.ok => Ok(result),
            _ => Err(BotError::Network(format!(
                "{} failed ({}): {}",
                method,
                status,
                envelope.description.unwrap_or_default()
            ))),
        }
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Me {
            id: i64,
            first_name: String,
            username: String,
        }

        let me: Me = self.call("getMe", &serde_json::json!({})).await?;
        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username,
        };

        Ok(())
    }

    /// Long-poll for message updates after `offset`
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdates<'a> {
            offset: i64,
            timeout: i64,
            allowed_updates: &'a [&'a str],
        }

        self.call("getUpdates", &GetUpdates {
            offset,
            timeout,
            allowed_updates: &["message"],
        })
        .await
    }

    /// Get the next update offset. Keeps `current` when there are no updates.
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Send a plain-text message, returning the new message id
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessage<'a> {
            chat_id: &'a str,
            text: String,
        }

        #[derive(Deserialize)]
        struct Sent {
            message_id: i64,
        }

        let sent: Sent = self
            .call("sendMessage", &SendMessage { chat_id, text: truncate(text, MAX_MESSAGE_CHARS) })
            .await?;
        Ok(sent.message_id.to_string())
    }

    /// Publish the command menu shown by Telegram clients
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct BotCommand<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommands<'a> {
            commands: &'a [BotCommand<'a>],
        }

        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|(name, description)| BotCommand {
                command: name,
                description: if description.is_empty() { name } else { description },
            })
            .collect();

        let _: bool = self
            .call("setMyCommands", &SetMyCommands { commands: &commands })
            .await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

/// First characters of the token, safe to log
fn token_preview(token: &str) -> String {
    token.chars().take(8).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", token_preview(&self.token));
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        match self.send_message_api(chat_id, text).await {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Content;

    fn updates(json: &str) -> Vec<Update> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn next_offset_is_one_past_the_latest_update() {
        let batch = updates(r#"[
            {"update_id": 10, "message": null},
            {"update_id": 12, "message": null}
        ]"#);
        assert_eq!(TelegramAdapter::get_next_offset(&batch, 0), 13);
        assert_eq!(TelegramAdapter::get_next_offset(&[], 13), 13);
    }

    #[test]
    fn text_message_becomes_command_from_sender() {
        let batch = updates(r#"[{
            "update_id": 1,
            "message": {
                "message_id": 5,
                "from": {"id": 777, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": -100, "type": "group"},
                "date": 1700000000,
                "text": "/add@tasky_bot Buy milk"
            }
        }]"#);

        let parser = MessageParser::new("/").with_bot_username("tasky_bot");
        let message = batch[0].message.as_ref().unwrap();
        let msg = message.to_domain(&parser).unwrap();

        assert_eq!(msg.chat_id, "-100");
        assert_eq!(msg.user_id(), Some(777));
        assert_eq!(msg.platform, "telegram");
        assert_eq!(msg.timestamp.timestamp(), 1700000000);
        assert_eq!(
            msg.content,
            Content::Command { name: "add".to_string(), args: vec!["Buy".to_string(), "milk".to_string()] }
        );
    }

    #[test]
    fn messages_without_text_are_skipped() {
        let batch = updates(r#"[{
            "update_id": 2,
            "message": {"message_id": 6, "chat": {"id": 1}, "date": 1700000000}
        }]"#);

        let parser = MessageParser::new("/");
        assert!(batch[0].message.as_ref().unwrap().to_domain(&parser).is_none());
    }

    #[test]
    fn error_envelope_has_no_result() {
        let ok: ApiResponse<bool> = serde_json::from_str(r#"{"ok": true, "result": true}"#).unwrap();
        assert_eq!(ok.result, Some(true));

        let failed: ApiResponse<Vec<Update>> = serde_json::from_str(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        ).unwrap();
        assert!(!failed.ok);
        assert!(failed.result.is_none());
        assert_eq!(failed.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn token_preview_handles_multibyte_tokens() {
        assert_eq!(token_preview("123456:ABCDEF"), "123456:A");
        assert_eq!(token_preview("1234567é89"), "1234567é");
        assert_eq!(token_preview("short"), "short");
    }

    #[test]
    fn long_replies_are_cut_on_char_boundary() {
        let text = "é".repeat(5000);
        let cut = truncate(&text, MAX_MESSAGE_CHARS);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(truncate("short", MAX_MESSAGE_CHARS), "short");
    }
}
