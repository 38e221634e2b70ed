//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command routing and the per-bot handlers
//! - Formatter: Reply text
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod errors;
pub mod formatter;
pub mod messaging;
pub mod services;
