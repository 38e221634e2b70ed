//! Application layer errors

use thiserror::Error;

/// Runner and platform errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing or malformed arguments. Carries the text shown to the user.
    #[error("{0}")]
    InvalidArgs(String),

    /// The quote API has no record for what the user asked. Carries the text
    /// shown to the user.
    #[error("{0}")]
    NotFound(String),

    #[error("Quote lookup failed: {0}")]
    Quote(#[from] QuoteError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl CommandError {
    /// Whether the error is the user's to fix (as opposed to an upstream or
    /// storage failure).
    pub fn is_user_facing(&self) -> bool {
        matches!(self, CommandError::InvalidArgs(_) | CommandError::NotFound(_))
    }
}

/// Quote API errors
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("No quote found for {0}")]
    NotFound(String),

    #[error("Quote API unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::UpstreamUnavailable(e.to_string())
    }
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_errors_display_their_message_verbatim() {
        let err = CommandError::InvalidArgs("❌ Usage: /top [quantity]".to_string());
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "❌ Usage: /top [quantity]");

        let err = CommandError::from(QuoteError::UpstreamUnavailable("timeout".to_string()));
        assert!(!err.is_user_facing());
    }
}
