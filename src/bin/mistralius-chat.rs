//! Interactive chat application for conversing with Mistral models.
//!
//! This binary provides a REPL interface for chatting with Mistral models
//! via the chat-completions API, with either plain text turns or text plus
//! one image per turn.
//!
//! # Usage
//!
//! ```bash
//! # Choose mode and model from menus
//! MISTRAL_API_KEY=... mistralius-chat
//!
//! # Text conversation with a specific model
//! mistralius-chat --mode text --model open-mistral-nemo
//!
//! # Ask questions about an image
//! mistralius-chat --mode image --image cat.jpg
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/history` - Show the conversation so far
//! - `/clear` - Clear conversation history
//! - `/mode <text|image>` - Start over in another mode
//! - `/quit` - Exit the application

use std::fmt::Display;
use std::path::Path;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use mistralius::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use mistralius::{EncodedImage, Error, Mistral, Mode, Model};

const API_KEY_VAR: &str = "MISTRAL_API_KEY";
const BASE_URL_VAR: &str = "MISTRAL_BASE_URL";

/// Main entry point for the mistralius-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (args, _) = ChatArgs::from_command_line_relaxed("mistralius-chat [OPTIONS]");
    let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
        Error::authentication(format!("{API_KEY_VAR} environment variable not set"))
    })?;
    let base_url = std::env::var(BASE_URL_VAR).ok();

    let mut rl = DefaultEditor::new()?;

    let arg_mode = args.mode()?;
    let arg_model = args.model()?;
    let mode = match (arg_mode, arg_model) {
        (Some(mode), _) => mode,
        (None, Some(model)) => model.mode(),
        (None, None) => {
            match choose(&mut rl, "Select a mode:", &[Mode::TextOnly, Mode::TextAndImage])? {
                Some(mode) => mode,
                None => return Ok(()),
            }
        }
    };
    let model = match arg_model {
        Some(model) => model,
        None => match choose_model(&mut rl, mode)? {
            Some(model) => model,
            None => return Ok(()),
        },
    };

    let config = args.into_config(mode, model)?;
    let use_color = config.use_color;
    let mut renderer = PlainTextRenderer::with_color(use_color);
    if let Err(err) = config.validate() {
        renderer.print_error(&err.to_string());
        std::process::exit(1);
    }

    let client = Mistral::with_options(api_key, base_url, Some(config.timeout))?;

    let mut image = match config.image_path.as_deref() {
        Some(path) => match EncodedImage::from_path(path) {
            Ok(image) => Some(image),
            Err(err) => {
                renderer.print_error(&err.to_string());
                None
            }
        },
        None => None,
    };
    if mode.requires_image() && image.is_none() {
        image = prompt_for_image(&mut rl, &mut renderer)?;
        if image.is_none() {
            return Ok(());
        }
    }

    let mut session = ChatSession::start(client, config)?;

    println!(
        "Mistral Chat (mode: {}, model: {})",
        session.mode(),
        session.model()
    );
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear_history();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::History => {
                            renderer.print_history(session.history());
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Image(path) => match EncodedImage::from_path(&path) {
                            Ok(loaded) => {
                                image = Some(loaded);
                                if session.mode().requires_image() {
                                    renderer.print_info(&format!("Image set to {}", path));
                                } else {
                                    renderer.print_info(&format!(
                                        "Image loaded from {}; it is used after /mode image",
                                        path
                                    ));
                                }
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Mode(mode) => {
                            if mode == session.mode() {
                                renderer.print_info(&format!("Already in {mode} mode."));
                                continue;
                            }
                            let Some(model) = choose_model(&mut rl, mode)? else {
                                break;
                            };
                            if mode.requires_image() && image.is_none() {
                                image = prompt_for_image(&mut rl, &mut renderer)?;
                                if image.is_none() {
                                    break;
                                }
                            }
                            session = restart(session, mode, model)?;
                            renderer.print_info(&format!(
                                "New conversation (mode: {mode}, model: {model})"
                            ));
                        }
                        ChatCommand::Model(model) => {
                            let config = session.config().switched_to(session.mode(), model);
                            if let Err(err) = config.validate() {
                                renderer.print_error(&format!(
                                    "{err}; switch modes with /mode first"
                                ));
                                continue;
                            }
                            session = restart(session, config.mode, model)?;
                            renderer.print_info(&format!(
                                "New conversation with model {model}"
                            ));
                        }
                        ChatCommand::Models => {
                            print_models(session.model());
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                let attachment = if session.mode().requires_image() {
                    image.as_ref()
                } else {
                    None
                };
                match session.ask(line, attachment).await {
                    Ok(reply) => renderer.print_reply(&reply),
                    Err(err) if err.is_mode_mismatch() => {
                        renderer.print_error(&format!("{err}; load one with /image <path>"))
                    }
                    Err(err) => renderer.print_error(&err.to_string()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Starts a fresh session on the same client.
fn restart(session: ChatSession, mode: Mode, model: Model) -> Result<ChatSession, Error> {
    let config: ChatConfig = session.config().switched_to(mode, model);
    ChatSession::start(session.into_completion(), config)
}

/// Shows a numbered menu until the user picks an entry.
///
/// Entries can be picked by number or by name. Returns `None` on end of input.
fn choose<T: Copy + Display>(
    rl: &mut DefaultEditor,
    title: &str,
    options: &[T],
) -> Result<Option<T>, ReadlineError> {
    println!("{title}");
    for (index, option) in options.iter().enumerate() {
        println!("  {}. {}", index + 1, option);
    }
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(None),
            Err(err) => return Err(err),
        };
        let line = line.trim();
        let picked = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
            .or_else(|| options.iter().find(|option| option.to_string() == line));
        match picked {
            Some(option) => return Ok(Some(*option)),
            None => println!("Please enter a number between 1 and {}.", options.len()),
        }
    }
}

/// Picks a model for `mode`, skipping the menu when there is only one.
fn choose_model(rl: &mut DefaultEditor, mode: Mode) -> Result<Option<Model>, ReadlineError> {
    match mode.allowed_models() {
        [only] => Ok(Some(*only)),
        models => choose(rl, "Select a model:", models),
    }
}

/// Asks for an image path until one encodes. Returns `None` on end of input.
fn prompt_for_image(
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) -> Result<Option<EncodedImage>, ReadlineError> {
    loop {
        let line = match rl.readline("Image path: ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(None),
            Err(err) => return Err(err),
        };
        let path = line.trim();
        if path.is_empty() {
            continue;
        }
        match EncodedImage::from_path(Path::new(path)) {
            Ok(image) => return Ok(Some(image)),
            Err(err) => renderer.print_error(&err.to_string()),
        }
    }
}

fn print_models(current: Model) {
    for mode in [Mode::TextOnly, Mode::TextAndImage] {
        println!("    {mode} mode:");
        for model in mode.allowed_models() {
            let marker = if *model == current { " (current)" } else { "" };
            println!("      - {model}{marker}");
        }
    }
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Mode: {}", stats.mode);
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Temperature: {}",
        stats
            .temperature
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "default".to_string())
    );
    println!(
        "      Max tokens: {}",
        stats
            .max_tokens
            .map(|v| v.to_string())
            .unwrap_or_else(|| "default".to_string())
    );
    if stats.mode.requires_image() {
        println!("      Image context: {:?}", stats.image_context);
    }
    println!(
        "      Turns: {} answered, {} failed",
        stats.successful_turns, stats.failed_turns
    );
    println!(
        "      Total tokens: {} in / {} out",
        stats.total_usage.prompt_tokens, stats.total_usage.completion_tokens
    );
    if let Some(usage) = stats.last_turn_usage {
        println!(
            "      Last turn tokens: {} in / {} out",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
}
