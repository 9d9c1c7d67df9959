//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

use crate::types::{Mode, Model};

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Print the conversation history.
    History,

    /// Load another image for subsequent image-mode turns.
    Image(String),

    /// Start a new session in another mode.
    Mode(Mode),

    /// Start a new session with another model.
    Model(Model),

    /// List the models available in each mode.
    Models,

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use mistralius::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/model open-mistral-nemo").is_some());
/// assert!(parse_command("Bonjour!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "history" | "h" => ChatCommand::History,
        "image" => match argument {
            Some(path) => ChatCommand::Image(path.to_string()),
            None => ChatCommand::Invalid("/image requires a file path".to_string()),
        },
        "mode" => match argument {
            Some(arg) => match arg.parse::<Mode>() {
                Ok(mode) => ChatCommand::Mode(mode),
                Err(err) => ChatCommand::Invalid(err),
            },
            None => ChatCommand::Invalid("/mode requires 'text' or 'image'".to_string()),
        },
        "model" => match argument {
            Some(arg) => match arg.parse::<Model>() {
                Ok(model) => ChatCommand::Model(model),
                Err(err) => ChatCommand::Invalid(format!("{err} (see /models)")),
            },
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "models" => ChatCommand::Models,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Show the conversation so far
  /clear                 Clear conversation history
  /image <file>          Attach another image to subsequent turns (image mode)
  /mode <text|image>     Start a new conversation in another mode
  /model <name>          Start a new conversation with another model
  /models                List the models available in each mode
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
}
