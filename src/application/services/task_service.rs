//! Tasky commands: a per-user to-do list.

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::formatter;
use crate::application::services::{sender_id, CommandService};
use crate::domain::entities::{Command, Message, NewTask, Task};
use crate::domain::traits::ResourceStore;

const USAGE_ADD: &str = "❌ Usage: /add [task]";
const USAGE_DELETE: &str = "❌ Usage: /delete [task_id]";

/// Register all Tasky commands, followed by `/start` and `/help`.
pub fn register_task_commands(commands: &mut CommandService, tasks: Arc<dyn ResourceStore<Task>>) {
    let store = tasks.clone();
    commands.register(Command::new("add")
        .with_description("Add a task")
        .with_usage("/add [task]")
        .with_handler(move |msg| add(store.clone(), msg)));

    let store = tasks.clone();
    commands.register(Command::new("list")
        .with_description("Show tasks")
        .with_handler(move |msg| list(store.clone(), msg)));

    let store = tasks;
    commands.register(Command::new("delete")
        .with_description("Delete a task")
        .with_usage("/delete [task_id]")
        .with_aliases(vec!["done".to_string()])
        .with_handler(move |msg| delete(store.clone(), msg)));

    commands.register_defaults(formatter::tasky_welcome);
}

async fn add(tasks: Arc<dyn ResourceStore<Task>>, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let text = msg.content.args().join(" ");
    if text.is_empty() {
        return Err(CommandError::InvalidArgs(USAGE_ADD.to_string()));
    }

    let id = tasks.create(user_id, NewTask::new(text.clone()))?;
    tracing::info!("Added task {} for user {}", id, user_id);
    Ok(formatter::task_added(&text))
}

async fn list(tasks: Arc<dyn ResourceStore<Task>>, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let rows = tasks.list(user_id)?;
    Ok(formatter::task_list(&rows))
}

async fn delete(tasks: Arc<dyn ResourceStore<Task>>, msg: Message) -> Result<String, CommandError> {
    let user_id = sender_id(&msg)?;
    let Some(raw) = msg.content.args().first() else {
        return Err(CommandError::InvalidArgs(USAGE_DELETE.to_string()));
    };
    let task_id: i64 = raw
        .parse()
        .map_err(|_| CommandError::InvalidArgs("Invalid task ID.".to_string()))?;

    let removed = tasks.delete(task_id, user_id)?;
    if !removed {
        tracing::debug!("Task {} not found for user {}", task_id, user_id);
    }
    Ok(formatter::task_deleted(task_id, removed))
}
