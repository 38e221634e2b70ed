//! Domain entities - Core business objects with no external dependencies

pub mod alert;
pub mod command;
pub mod message;
pub mod task;
pub mod user;

pub use alert::{NewAlert, PriceAlert};
pub use command::{Command, CommandHandler, CommandRegistry, HandlerFuture};
pub use message::{Content, Message};
pub use task::{NewTask, Task};
pub use user::User;
