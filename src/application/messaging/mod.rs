//! Message handling - turns raw chat text into commands

pub mod parser;

pub use parser::MessageParser;
