// Library interface for chatbot-cli so integration tests can reach the
// command parser. main.rs declares the same file as a module.

#[path = "commands.rs"]
pub mod commands;

pub use commands::{handle_command, CommandResult};
