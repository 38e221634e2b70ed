use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::Instrument;

use mate_bots::application::errors::BotError;
use mate_bots::application::messaging::MessageParser;
use mate_bots::application::services::{
    register_crypto_commands, register_task_commands, CommandService, CryptoContext,
};
use mate_bots::domain::entities::{Content, Message, PriceAlert, Task, User};
use mate_bots::domain::traits::Bot;
use mate_bots::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use mate_bots::infrastructure::config::{BotKind, Config};
use mate_bots::infrastructure::database::Database;
use mate_bots::infrastructure::quotes::CoinGeckoClient;

#[derive(Parser)]
#[command(name = "mate-bots")]
#[command(about = "CryptoMate and Tasky Telegram bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a bot
    Run {
        #[arg(value_enum)]
        bot: BotKind,
    },
    /// Show version
    Version,
    /// Print the default config for a bot
    InitConfig {
        #[arg(value_enum)]
        bot: BotKind,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { bot } => {
            if let Err(e) = run_bot(bot, cli.config, cli.token) {
                tracing::error!("{} stopped: {}", bot.as_str(), e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("mate-bots v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig { bot } => {
            init_config(bot);
        }
    }
}

fn load_config(kind: BotKind, config_path: Option<String>) -> Config {
    let Some(path) = config_path else {
        return Config::load_env(kind);
    };

    if !Path::new(&path).exists() {
        tracing::warn!("Config {} not found, using defaults", path);
        return Config::load_env(kind);
    }

    match Config::load(&path) {
        Ok(mut config) if config.bot.kind == kind => {
            config.apply_env();
            config
        }
        Ok(config) => {
            tracing::warn!(
                "Config {} is for {}, not {}; using defaults",
                path,
                config.bot.kind.as_str(),
                kind.as_str()
            );
            Config::load_env(kind)
        }
        Err(e) => {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env(kind)
        }
    }
}

fn run_bot(kind: BotKind, config_path: Option<String>, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(kind, config_path);

    tracing::info!("Starting {}", config.bot.name);

    let db = Arc::new(Database::new(&config.database.path)?);
    match kind {
        BotKind::CryptoMate => db.ensure_table::<PriceAlert>()?,
        BotKind::Tasky => db.ensure_table::<Task>()?,
    }
    tracing::info!("Database ready at {}", config.database.path.display());

    let mut commands = CommandService::new(&config.bot.prefix);
    match kind {
        BotKind::CryptoMate => {
            let quotes = CoinGeckoClient::new(&config.quotes)
                .map_err(|e| BotError::Internal(format!("Failed to build quote client: {}", e)))?;
            register_crypto_commands(&mut commands, CryptoContext {
                alerts: db.clone(),
                quotes: Arc::new(quotes),
                max_top: config.quotes.max_top,
            });
        }
        BotKind::Tasky => register_task_commands(&mut commands, db.clone()),
    }
    let commands = Arc::new(commands);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    if let Some(token) = token_override.or_else(|| config.telegram.token.clone()) {
        rt.block_on(async {
            let mut bot = TelegramAdapter::new(token, &config.bot.name);

            // Fetch bot info
            bot.fetch_bot_info().await?;

            // Register bot commands with Telegram
            if let Err(e) = bot.register_commands(&commands.descriptions()).await {
                tracing::warn!("Failed to register commands: {}", e);
            }

            run_telegram_bot(bot, commands, &config).await
        })
    } else {
        tracing::warn!("No token in {} or config, running in console mode", config.telegram.token_env);
        rt.block_on(async {
            let bot = ConsoleAdapter::new(&config.bot.name);
            run_console_bot(bot, commands, &config).await
        })
    }
}

/// Run one command and send its reply, if any.
async fn dispatch<B: Bot + ?Sized>(bot: &B, commands: &CommandService, msg: Message) {
    let Some(reply) = commands.respond(&msg).await else {
        return;
    };

    tracing::info!("Sending response to chat_id {}: {}", msg.chat_id, reply.chars().take(100).collect::<String>());
    if let Err(e) = bot.send_message(&msg.chat_id, &reply).await {
        tracing::error!("Failed to send message: {}", e);
    }
}

fn command_span(kind: BotKind, msg: &Message) -> tracing::Span {
    let name = match &msg.content {
        Content::Command { name, .. } => name.as_str(),
        _ => "",
    };
    let sender = msg.sender.as_ref().map(|u| u.to_string()).unwrap_or_default();
    tracing::info_span!("command", bot = kind.as_str(), name, user_id = ?msg.user_id(), %sender, id = %msg.id)
}

async fn run_telegram_bot(bot: TelegramAdapter, commands: Arc<CommandService>, config: &Config) -> Result<(), BotError> {
    bot.start().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let parser = MessageParser::new(commands.prefix()).with_bot_username(&info.username);
    let bot = Arc::new(bot);
    let kind = config.bot.kind;

    let mut offset: i64 = 0;
    let timeout_seconds = config.telegram.poll_timeout;

    tracing::info!("Starting message loop...");

    loop {
        let updates = tokio::select! {
            result = bot.get_updates(offset, timeout_seconds) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
        };

        match updates {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                }

                for update in &updates {
                    let Some(message) = &update.message else {
                        continue;
                    };
                    let Some(msg) = message.to_domain(&parser) else {
                        continue;
                    };
                    if !msg.content.is_command() || msg.sender.as_ref().is_some_and(|u| u.is_bot) {
                        continue;
                    }

                    // Each command runs on its own task so a slow quote lookup
                    // only delays its own reply
                    let bot = bot.clone();
                    let commands = commands.clone();
                    let span = command_span(kind, &msg);
                    tokio::spawn(async move {
                        dispatch(bot.as_ref(), &commands, msg).await;
                    }.instrument(span));
                }

                // Update offset
                offset = TelegramAdapter::get_next_offset(&updates, offset);
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: ConsoleAdapter, commands: Arc<CommandService>, config: &Config) -> Result<(), BotError> {
    bot.start().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: {} (type /help, Ctrl-D to quit)", info.name);

    let parser = MessageParser::new(commands.prefix());
    let user = User::new(config.console.user_id).with_username("console");

    // Main loop (for console mode)
    while let Some(input) = bot.read_line().await {
        if input.is_empty() {
            continue;
        }

        let msg = parser.parse("console", input, Some(user.clone())).with_platform("console");
        if !msg.content.is_command() {
            let _ = bot.send_message("console", "Commands start with /. Try /help").await;
            continue;
        }

        let span = command_span(config.bot.kind, &msg);
        dispatch(&bot, &commands, msg).instrument(span).await;
    }

    Ok(())
}

fn init_config(kind: BotKind) {
    if let Err(e) = write_default_config(kind, &mut std::io::stdout().lock()) {
        eprintln!("Failed to render config: {}", e);
        std::process::exit(1);
    }
    eprintln!("Save this to a file, adjust as needed and pass it with --config.");
}

/// Write only the YAML, so stdout can be redirected straight into a config file.
fn write_default_config(kind: BotKind, out: &mut impl Write) -> Result<(), BotError> {
    let yaml = Config::defaults_for(kind).to_yaml()?;
    out.write_all(yaml.as_bytes())
        .map_err(|e| BotError::Internal(format!("Failed to write config: {}", e)))
}
