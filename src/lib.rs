//! Two Telegram bots on one command-dispatch core: CryptoMate (coin quotes
//! and stored price alerts) and Tasky (a per-user to-do list).

pub mod application;
pub mod domain;
pub mod infrastructure;
