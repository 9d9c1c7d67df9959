//! Chat application module for interactive conversations with Mistral models.
//!
//! This module provides a REPL chat interface built on top of the
//! mistralius client library. It supports:
//!
//! - Text-only and text-plus-image conversations
//! - Slash commands for history inspection and session control
//! - Configurable model, sampling parameters and timeout
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`history`]: The per-session message log
//! - [`session`]: Core chat session management and API interaction
//! - [`commands`]: Slash command parsing and handling
//! - [`render`]: Terminal output

mod commands;
mod config;
mod history;
mod render;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig, ImageContext};
pub use history::MessageHistory;
pub use render::{PlainTextRenderer, Renderer, format_entry};
pub use session::{ChatSession, SessionStats, Turn};
