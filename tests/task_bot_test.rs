//! Tasky Integration Tests
//! Run with: cargo test --test task_bot_test

use std::sync::{Arc, Once};

use mate_bots::application::messaging::MessageParser;
use mate_bots::application::services::{register_task_commands, CommandService};
use mate_bots::domain::entities::{Task, User};
use mate_bots::domain::traits::ResourceStore;
use mate_bots::infrastructure::database::Database;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

struct Harness {
    db: Arc<Database>,
    commands: CommandService,
    parser: MessageParser,
}

impl Harness {
    fn new() -> Self {
        ensure_init();

        let db = Arc::new(Database::open_in_memory().expect("in-memory db"));
        db.ensure_table::<Task>().expect("tasks table");

        let mut commands = CommandService::new("/");
        register_task_commands(&mut commands, db.clone());

        Self { db, commands, parser: MessageParser::new("/") }
    }

    async fn send(&self, user_id: i64, text: &str) -> Option<String> {
        let msg = self.parser.parse(user_id.to_string(), text, Some(User::new(user_id)));
        self.commands.respond(&msg).await
    }

    async fn reply(&self, user_id: i64, text: &str) -> String {
        self.send(user_id, text).await.expect("command should reply")
    }
}

#[tokio::test]
async fn test_added_task_shows_up_in_list() {
    let bot = Harness::new();

    assert_eq!(bot.reply(7, "/add Buy milk").await, "Task added: Buy milk");

    let list = bot.reply(7, "/list").await;
    assert!(list.starts_with("Your To-Do List:"), "{}", list);
    assert!(list.contains("1. Buy milk"), "{}", list);
}

#[tokio::test]
async fn test_list_is_in_creation_order() {
    let bot = Harness::new();

    bot.reply(7, "/add first").await;
    bot.reply(7, "/add second").await;
    bot.reply(7, "/add third").await;

    assert_eq!(bot.reply(7, "/list").await, "Your To-Do List:\n1. first\n2. second\n3. third");
}

#[tokio::test]
async fn test_empty_list_points_at_add() {
    let bot = Harness::new();
    assert_eq!(bot.reply(7, "/list").await, "No tasks found. Use /add to add a task.");
}

#[tokio::test]
async fn test_add_without_text_shows_usage() {
    let bot = Harness::new();

    let reply = bot.reply(7, "/add").await;
    assert!(reply.contains("/add [task]"), "{}", reply);

    let stored: Vec<Task> = bot.db.list(7).unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_delete_own_task() {
    let bot = Harness::new();

    bot.reply(7, "/add Buy milk").await;
    bot.reply(7, "/add Call mom").await;

    assert_eq!(bot.reply(7, "/delete 1").await, "Task 1 deleted.");
    assert_eq!(bot.reply(7, "/list").await, "Your To-Do List:\n2. Call mom");
}

#[tokio::test]
async fn test_done_is_an_alias_for_delete() {
    let bot = Harness::new();

    bot.reply(7, "/add Buy milk").await;
    assert_eq!(bot.reply(7, "/done 1").await, "Task 1 deleted.");
}

#[tokio::test]
async fn test_users_cannot_see_or_delete_each_others_tasks() {
    let bot = Harness::new();

    bot.reply(1, "/add mine").await;

    assert_eq!(bot.reply(2, "/list").await, "No tasks found. Use /add to add a task.");
    assert_eq!(bot.reply(2, "/delete 1").await, "Task 1 not found.");

    // Still there for its owner
    assert!(bot.reply(1, "/list").await.contains("1. mine"));
}

#[tokio::test]
async fn test_delete_missing_or_bad_id() {
    let bot = Harness::new();

    assert_eq!(bot.reply(7, "/delete 42").await, "Task 42 not found.");
    assert_eq!(bot.reply(7, "/delete abc").await, "Invalid task ID.");
    assert!(bot.reply(7, "/delete").await.contains("/delete [task_id]"));
}

#[tokio::test]
async fn test_start_and_help_list_commands() {
    let bot = Harness::new();

    let start = bot.reply(7, "/start").await;
    assert!(start.starts_with("📝 Welcome to To-Do Bot!"), "{}", start);
    for cmd in ["/add [task]", "/list", "/delete [task_id]"] {
        assert!(start.contains(cmd), "missing {} in {}", cmd, start);
    }

    let help = bot.reply(7, "/help").await;
    assert!(help.starts_with("Commands:"), "{}", help);
    assert!(start.ends_with(&help));
}

#[tokio::test]
async fn test_unknown_commands_and_plain_text_get_no_reply() {
    let bot = Harness::new();

    assert_eq!(bot.send(7, "/frobnicate").await, None);
    assert_eq!(bot.send(7, "hello there").await, None);
}

#[tokio::test]
async fn test_command_without_sender_is_rejected() {
    let bot = Harness::new();

    let msg = bot.parser.parse("chat", "/add orphan", None);
    let reply = bot.commands.respond(&msg).await.unwrap();
    assert_eq!(reply, "I can't tell who sent this command.");
}
