//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Which bot a process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BotKind {
    CryptoMate,
    Tasky,
}

impl BotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotKind::CryptoMate => "crypto-mate",
            BotKind::Tasky => "tasky",
        }
    }

    /// Environment variable holding this bot's Telegram token.
    pub fn token_env(&self) -> &'static str {
        match self {
            BotKind::CryptoMate => "CRYPTO_MATE_BOT_TOKEN",
            BotKind::Tasky => "TASKY_BOT_TOKEN",
        }
    }
}

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub kind: BotKind,
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Variable the token is read from when `token` is unset
    pub token_env: String,
    /// Long-poll timeout for getUpdates, in seconds
    pub poll_timeout: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QuotesConfig {
    pub base_url: String,
    pub vs_currency: String,
    /// Upper bound for /top
    pub max_top: u32,
    pub timeout_secs: u64,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            base_url: crate::infrastructure::quotes::API_BASE.to_string(),
            vs_currency: "usd".to_string(),
            max_top: 100,
            timeout_secs: 10,
        }
    }
}

/// Console (dev mode) settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    /// User id that console commands are attributed to
    pub user_id: i64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { user_id: 1 }
    }
}

impl Config {
    /// Defaults for one of the bots
    pub fn defaults_for(kind: BotKind) -> Self {
        let (name, db) = match kind {
            BotKind::CryptoMate => ("CryptoMate", "crypto.db"),
            BotKind::Tasky => ("Tasky", "todolist.db"),
        };

        Self {
            bot: BotConfig {
                kind,
                name: name.to_string(),
                prefix: "/".to_string(),
            },
            telegram: TelegramConfig {
                token: None,
                token_env: kind.token_env().to_string(),
                poll_timeout: 30,
            },
            database: DatabaseConfig {
                path: PathBuf::from(db),
            },
            quotes: QuotesConfig::default(),
            console: ConsoleConfig::default(),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_env(kind: BotKind) -> Self {
        let mut config = Self::defaults_for(kind);
        config.apply_env();
        config
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.telegram.token.is_none() {
            if let Some(token) = lookup(&self.telegram.token_env).filter(|t| !t.trim().is_empty()) {
                self.telegram.token = Some(token);
            }
        }

        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(url) = lookup("COINGECKO_API_URL") {
            self.quotes.base_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.is_empty() {
            return Err(ConfigError::MissingField("bot.prefix".to_string()));
        }
        if self.quotes.max_top == 0 {
            return Err(ConfigError::InvalidValue("quotes.max-top must be at least 1".to_string()));
        }
        if self.telegram.poll_timeout < 0 {
            return Err(ConfigError::InvalidValue("telegram.poll-timeout must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_differ_per_bot() {
        let crypto = Config::defaults_for(BotKind::CryptoMate);
        let tasky = Config::defaults_for(BotKind::Tasky);

        assert_eq!(crypto.telegram.token_env, "CRYPTO_MATE_BOT_TOKEN");
        assert_eq!(tasky.telegram.token_env, "TASKY_BOT_TOKEN");
        assert_eq!(crypto.database.path, PathBuf::from("crypto.db"));
        assert_eq!(tasky.database.path, PathBuf::from("todolist.db"));
    }

    #[test]
    fn yaml_round_trip_keeps_kebab_case_keys() {
        let yaml = Config::defaults_for(BotKind::Tasky).to_yaml().unwrap();
        assert!(yaml.contains("token-env: TASKY_BOT_TOKEN"));
        assert!(yaml.contains("kind: tasky"));

        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.kind, BotKind::Tasky);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let yaml = "
bot:
  kind: crypto-mate
  name: CryptoMate
  prefix: /
telegram:
  token: null
  token-env: CRYPTO_MATE_BOT_TOKEN
  poll-timeout: 10
database:
  path: /tmp/crypto.db
quotes:
  max-top: 25
";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.quotes.max_top, 25);
        assert_eq!(config.quotes.vs_currency, "usd");
        assert_eq!(config.console.user_id, 1);
    }

    #[test]
    fn zero_max_top_is_rejected() {
        let mut config = Config::defaults_for(BotKind::CryptoMate);
        config.quotes.max_top = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn env_overrides_apply_to_the_bots_own_token() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TASKY_BOT_TOKEN", "123:abc"),
            ("CRYPTO_MATE_BOT_TOKEN", "456:def"),
            ("DATABASE_PATH", "/data/tasks.db"),
        ]);

        let mut config = Config::defaults_for(BotKind::Tasky);
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.telegram.token.as_deref(), Some("123:abc"));
        assert_eq!(config.database.path, PathBuf::from("/data/tasks.db"));
        assert_eq!(config.bot.prefix, "/");
    }

    #[test]
    fn explicit_token_wins_over_env() {
        let mut config = Config::defaults_for(BotKind::CryptoMate);
        config.telegram.token = Some("from-file".to_string());
        config.apply_env_with(|_| Some("from-env".to_string()));

        assert_eq!(config.telegram.token.as_deref(), Some("from-file"));
    }
}
