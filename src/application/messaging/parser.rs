//! Message parser - Parses raw chat text into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Commands addressed as `/cmd@name` are only accepted when `name` is this
    /// bot's username.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();
        let trimmed = text.trim();

        if trimmed.starts_with('/') || (!self.command_prefix.is_empty() && trimmed.starts_with(&self.command_prefix)) {
            let content = self.parse_command(trimmed);
            return Message::new(chat_id, content).with_sender_opt(sender);
        }

        Message::new(chat_id, Content::Text(text)).with_sender_opt(sender)
    }

    fn parse_command(&self, text: &str) -> Content {
        // Remove the command prefix (either / or custom prefix)
        let cmd_text = match text.strip_prefix('/') {
            Some(rest) => rest,
            None => text.strip_prefix(self.command_prefix.as_str()).unwrap_or(text),
        };

        let mut parts = cmd_text.split_whitespace();
        let head = parts.next().unwrap_or("");
        let args: Vec<String> = parts.map(str::to_string).collect();

        let name = match head.split_once('@') {
            Some((name, addressee)) => {
                if let Some(ref me) = self.bot_username {
                    if !addressee.eq_ignore_ascii_case(me) {
                        tracing::debug!("Ignoring /{} addressed to @{}", name, addressee);
                        return Content::Empty;
                    }
                }
                name
            }
            None => head,
        };

        if name.is_empty() {
            return Content::Empty;
        }

        Content::Command {
            name: name.to_lowercase(),
            args,
        }
    }
}
