//! Application services - command routing and the two bots' handlers

pub mod command_service;
pub mod crypto_service;
pub mod task_service;

pub use command_service::CommandService;
pub use crypto_service::{register_crypto_commands, CryptoContext};
pub use task_service::register_task_commands;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Rows are owned by the sender, so every stateful command needs one.
pub(crate) fn sender_id(msg: &Message) -> Result<i64, CommandError> {
    msg.user_id()
        .ok_or_else(|| CommandError::InvalidArgs("I can't tell who sent this command.".to_string()))
}
