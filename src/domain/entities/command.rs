use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Future returned by a command handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<String, CommandError>> + Send>>;

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(Message) -> HandlerFuture + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub usage: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            usage: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Attach an async handler. The closure gets an owned message so the
    /// returned future can be spawned without borrowing the registry.
    pub fn with_handler<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Message) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, CommandError>> + Send + 'static,
    {
        self.handler = Some(Box::new(move |msg| Box::pin(handler(msg))));
        self
    }

    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.to_lowercase() == input_lower
            || self.aliases.iter().any(|a| a.to_lowercase() == input_lower)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// Command registry for managing available commands.
/// Iteration follows registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the earlier command.
    pub fn register(&mut self, command: Command) {
        let name = command.name.clone();
        if self.commands.insert(name.clone(), command).is_none() {
            self.order.push(name);
        }
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands
            .get(input)
            .or_else(|| self.commands.values().find(|c| c.matches(input)))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(name: &str) -> Command {
        let reply = name.to_string();
        Command::new(name).with_handler(move |_msg| {
            let reply = reply.clone();
            async move { Ok(reply) }
        })
    }

    #[test]
    fn find_is_case_insensitive_and_honours_aliases() {
        let mut registry = CommandRegistry::new();
        registry.register(echo("delete").with_aliases(vec!["del".to_string()]));

        assert!(registry.find("delete").is_some());
        assert!(registry.find("DELETE").is_some());
        assert!(registry.find("del").is_some());
        assert!(registry.find("remove").is_none());
    }

    #[test]
    fn all_keeps_registration_order() {
        let mut registry = CommandRegistry::new();
        for name in ["start", "add", "list", "delete"] {
            registry.register(echo(name));
        }
        registry.register(echo("add"));

        let names: Vec<&str> = registry.all().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["start", "add", "list", "delete"]);
        assert_eq!(registry.all().count(), 4);
    }

    #[tokio::test]
    async fn handler_future_resolves_to_reply() {
        let cmd = echo("ping");
        let handler = cmd.handler.as_ref().expect("handler set");
        let reply = handler(Message::from_command("1", "ping", vec![])).await;
        assert_eq!(reply.unwrap(), "ping");
    }
}
