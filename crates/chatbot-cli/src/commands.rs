/// Result of processing a slash command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Print the conversation so far.
    ShowHistory,
    /// Show backend, session state and token usage.
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let cmd = input.split_whitespace().next().unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/history" => CommandResult::ShowHistory,
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!("chatbot v{}", env!("CARGO_PKG_VERSION"))),
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
Commands:
  /history          Show the conversation so far
  /status           Show backend, session state and token usage
  /version          Show version information
  /help, /h         Show this help message
  /exit, /quit, /q  Quit

Anything else is sent to the model.";

    CommandResult::Message(help_text.into())
}
