use crate::application::errors::CommandError;
use crate::application::formatter;
use crate::domain::entities::{Command, CommandRegistry, Content, Message};

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Register `/start` and `/help` from whatever is registered so far.
    /// Call after the bot's own commands.
    pub fn register_defaults(&mut self, welcome: fn(&str) -> String) {
        let listing = self.get_help(None);

        let greeting = welcome(&listing);
        self.register(Command::new("start")
            .with_description("Start the bot")
            .with_handler(move |_msg| {
                let greeting = greeting.clone();
                async move { Ok(greeting) }
            }));

        self.register(Command::new("help")
            .with_description("Show available commands")
            .with_handler(move |_msg| {
                let listing = listing.clone();
                async move { Ok(listing) }
            }));
    }

    /// Run the handler for a command message.
    ///
    /// Returns `Ok(None)` for non-commands and unknown commands; those get no
    /// reply.
    pub async fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let Some(cmd) = self.registry.find(name) else {
            tracing::debug!("Unknown command /{}", name);
            return Ok(None);
        };

        tracing::debug!("Command: /{} with args: {:?}", cmd.name, args);

        match &cmd.handler {
            Some(handler) => Ok(Some(handler(message.clone()).await?)),
            None => Ok(Some(format!("Command /{} not implemented", cmd.name))),
        }
    }

    /// Like [`handle`](Self::handle) but folds errors into a reply. Upstream
    /// and storage failures are logged here.
    pub async fn respond(&self, message: &Message) -> Option<String> {
        match self.handle(message).await {
            Ok(reply) => reply,
            Err(e) => {
                if !e.is_user_facing() {
                    tracing::error!("Command failed for chat {}: {}", message.chat_id, e);
                }
                Some(formatter::error(&e))
            }
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("/{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command /{} not found", name);
        }

        // List all commands
        let mut help = "Commands:".to_string();
        for cmd in self.registry.all() {
            let usage = cmd.usage.clone().unwrap_or_else(|| format!("/{}", cmd.name));
            help.push_str(&format!("\n{} - {}", usage, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }

    /// `(name, description)` for every command, in registration order.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.registry
            .all()
            .map(|c| (c.name.clone(), c.description.clone().unwrap_or_default()))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CommandService {
        let mut commands = CommandService::new("/");
        commands.register(Command::new("echo")
            .with_description("Repeat the arguments")
            .with_usage("/echo [text]")
            .with_handler(|msg| async move {
                let args = msg.content.args();
                if args.is_empty() {
                    return Err(CommandError::InvalidArgs("❌ Usage: /echo [text]".to_string()));
                }
                Ok(args.join(" "))
            }));
        commands.register_defaults(formatter::tasky_welcome);
        commands
    }

    #[tokio::test]
    async fn dispatches_to_registered_handler() {
        let commands = service();
        let msg = Message::from_command("1", "echo", vec!["hi".to_string(), "there".to_string()]);

        assert_eq!(commands.handle(&msg).await.unwrap(), Some("hi there".to_string()));
    }

    #[tokio::test]
    async fn unknown_commands_and_text_get_no_reply() {
        let commands = service();

        let unknown = Message::from_command("1", "nope", vec![]);
        assert_eq!(commands.handle(&unknown).await.unwrap(), None);

        let text = Message::from_text("1", "just chatting");
        assert_eq!(commands.respond(&text).await, None);
    }

    #[tokio::test]
    async fn respond_turns_validation_errors_into_usage() {
        let commands = service();
        let msg = Message::from_command("1", "echo", vec![]);

        assert!(commands.handle(&msg).await.is_err());
        assert_eq!(commands.respond(&msg).await, Some("❌ Usage: /echo [text]".to_string()));
    }

    #[tokio::test]
    async fn start_lists_registered_commands() {
        let commands = service();
        let msg = Message::from_command("1", "start", vec![]);
        let reply = commands.handle(&msg).await.unwrap().unwrap();

        assert!(reply.starts_with("📝 Welcome to To-Do Bot!"));
        assert!(reply.contains("/echo [text] - Repeat the arguments"));
    }

    #[test]
    fn help_for_single_command_includes_usage() {
        let commands = service();
        assert_eq!(commands.get_help(Some("echo")), "/echo - Repeat the arguments\nUsage: /echo [text]");
        assert_eq!(commands.get_help(Some("missing")), "Command /missing not found");
    }

    #[test]
    fn descriptions_follow_registration_order() {
        let names: Vec<String> = service().descriptions().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["echo", "start", "help"]);
    }
}
