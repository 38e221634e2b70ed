//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod quotes;
pub mod store;

pub use bot::{Bot, BotInfo};
pub use quotes::{MarketEntry, QuoteSource};
pub use store::{Resource, ResourceStore};
