//! Domain layer - Core business objects with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: Users, messages, commands and the stored rows (alerts, tasks)
//! - Traits: Abstractions for infrastructure (Bot, ResourceStore, QuoteSource)

pub mod entities;
pub mod traits;
