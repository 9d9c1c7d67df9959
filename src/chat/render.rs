//! Output rendering for the chat application.
//!
//! A small trait sits between the REPL and the terminal so output style can
//! change without touching the session loop.

use std::io::{self, Stdout, Write};

use crate::types::{MessageParam, MessageParamContent, MessageRole};

/// ANSI escape code for dim text (used for history entries).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a complete assistant reply.
    fn print_reply(&mut self, text: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print the whole conversation.
    fn print_history(&mut self, history: &[MessageParam]);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, text: &str) {
        if self.use_color {
            println!("{ANSI_CYAN}Mistral:{ANSI_RESET} {text}");
        } else {
            println!("Mistral: {text}");
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_history(&mut self, history: &[MessageParam]) {
        if history.is_empty() {
            println!("    (history is empty)");
            return;
        }
        for (index, entry) in history.iter().enumerate() {
            let line = format_entry(index + 1, entry);
            if self.use_color {
                println!("{ANSI_DIM}{line}{ANSI_RESET}");
            } else {
                println!("{line}");
            }
        }
        self.flush();
    }
}

/// Formats one history entry as a single display line.
///
/// Image parts are shown as `[image]` rather than their data URL.
pub fn format_entry(number: usize, entry: &MessageParam) -> String {
    let label = match entry.role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Mistral",
    };
    let body = match &entry.content {
        MessageParamContent::String(text) => text.clone(),
        MessageParamContent::Parts(_) => {
            let images = entry.content.image_count();
            let marker = if images == 1 {
                "[image]".to_string()
            } else {
                format!("[{images} images]")
            };
            format!("{} {marker}", entry.content.text())
        }
    };
    format!("    {number:>3}. {label}: {body}")
}
