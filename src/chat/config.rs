//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::error::{Error, Result};
use crate::types::{Mode, Model};

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 400;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for the mistralius-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Conversation mode.
    #[arrrg(optional, "Conversation mode: text or image (prompted if omitted)", "MODE")]
    pub mode: Option<String>,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (prompted if omitted)", "MODEL")]
    pub model: Option<String>,

    /// Image attached to every turn in image mode.
    #[arrrg(optional, "Image file to attach in image mode", "PATH")]
    pub image: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Sampling temperature (default: 0.7)", "TEMP")]
    pub temperature: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 400)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// HTTP timeout.
    #[arrrg(optional, "Request timeout in seconds (default: 30)", "SECS")]
    pub timeout: Option<u64>,

    /// Send only the newest turn in image mode.
    #[arrrg(flag, "In image mode, send only the newest turn instead of the whole history")]
    pub latest_image_only: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Invalid values on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatArgsError {
    /// `--mode` was not `text` or `image`.
    InvalidMode(String),
    /// `--model` was not an allow-listed model.
    InvalidModel(String),
    /// `--temperature` was not a number between 0.0 and 1.5.
    InvalidTemperature(String),
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArgsError::InvalidMode(message) => write!(f, "{message}"),
            ChatArgsError::InvalidModel(name) => write!(
                f,
                "Invalid model: {name}. Valid options: {}",
                Model::ALL
                    .iter()
                    .map(Model::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            ChatArgsError::InvalidTemperature(value) => {
                write!(f, "Invalid temperature: {value}. Expected a value between 0.0 and 1.5")
            }
        }
    }
}

impl std::error::Error for ChatArgsError {}

impl ChatArgs {
    /// The mode given with `--mode`, if any.
    pub fn mode(&self) -> std::result::Result<Option<Mode>, ChatArgsError> {
        self.mode
            .as_deref()
            .map(|s| s.parse::<Mode>().map_err(ChatArgsError::InvalidMode))
            .transpose()
    }

    /// The model given with `--model`, if any.
    pub fn model(&self) -> std::result::Result<Option<Model>, ChatArgsError> {
        self.model
            .as_deref()
            .map(|s| {
                s.parse::<Model>()
                    .map_err(|_| ChatArgsError::InvalidModel(s.to_string()))
            })
            .transpose()
    }

    /// Builds the session configuration once mode and model are settled.
    pub fn into_config(
        self,
        mode: Mode,
        model: Model,
    ) -> std::result::Result<ChatConfig, ChatArgsError> {
        let temperature = self
            .temperature
            .as_deref()
            .map(parse_temperature)
            .transpose()?;
        let mut config = ChatConfig::new(mode, model)
            .with_image_path(self.image.map(PathBuf::from))
            .with_timeout(Duration::from_secs(
                self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ));
        if let Some(temperature) = temperature {
            config = config.with_temperature(Some(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            config = config.with_max_tokens(Some(max_tokens));
        }
        if self.latest_image_only {
            config = config.with_image_context(ImageContext::LatestOnly);
        }
        if self.no_color {
            config = config.without_color();
        }
        Ok(config)
    }
}

fn parse_temperature(s: &str) -> std::result::Result<f32, ChatArgsError> {
    match s.trim().parse::<f32>() {
        Ok(temperature) if (0.0..=1.5).contains(&temperature) => Ok(temperature),
        _ => Err(ChatArgsError::InvalidTemperature(s.to_string())),
    }
}

/// Which part of the history an image-mode request carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ImageContext {
    /// Send the whole history, as in text mode.
    #[default]
    Full,
    /// Send only the newest user entry; earlier turns stay local.
    LatestOnly,
}

/// Configuration for a chat session.
///
/// Mode and model are fixed for the lifetime of a session; changing either
/// means starting a new session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Text-only or text-and-image turns.
    pub mode: Mode,

    /// The model to use for generating responses.
    pub model: Model,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional maximum tokens per response.
    pub max_tokens: Option<u32>,

    /// History sent with image-mode requests.
    pub image_context: ImageContext,

    /// Image to encode at startup.
    pub image_path: Option<PathBuf>,

    /// HTTP timeout for each completion.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Temperature: 0.7
    /// - Max tokens: 400
    /// - Image context: full history
    /// - Timeout: 30 seconds
    /// - Color: enabled
    pub fn new(mode: Mode, model: Model) -> Self {
        Self {
            mode,
            model,
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            image_context: ImageContext::Full,
            image_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_color: true,
        }
    }

    /// Checks that the model belongs to the mode's allow-list.
    pub fn validate(&self) -> Result<()> {
        if self.mode.allows(self.model) {
            Ok(())
        } else {
            Err(Error::invalid_model_for_mode(self.model, self.mode))
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets how much history image-mode requests carry.
    pub fn with_image_context(mut self, image_context: ImageContext) -> Self {
        self.image_context = image_context;
        self
    }

    /// Sets the image to load at startup.
    pub fn with_image_path(mut self, path: Option<PathBuf>) -> Self {
        self.image_path = path;
        self
    }

    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Returns a copy with another mode and model, keeping everything else.
    pub fn switched_to(&self, mode: Mode, model: Model) -> Self {
        Self {
            mode,
            model,
            ..self.clone()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new(Mode::TextOnly, Mode::TextOnly.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.mode, Mode::TextOnly);
        assert_eq!(config.model, Model::MistralSmallLatest);
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(400));
        assert_eq!(config.image_context, ImageContext::Full);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.image_path.is_none());
        assert!(config.use_color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_cross_mode_model() {
        let config = ChatConfig::new(Mode::TextOnly, Model::Pixtral12b2409);
        assert!(config.validate().unwrap_err().is_invalid_model_for_mode());

        let config = ChatConfig::new(Mode::TextAndImage, Model::OpenMistralNemo);
        assert!(config.validate().unwrap_err().is_invalid_model_for_mode());
    }

    #[test]
    fn args_defaults() {
        let args = ChatArgs::default();
        assert_eq!(args.mode(), Ok(None));
        assert_eq!(args.model(), Ok(None));

        let config = args
            .into_config(Mode::TextOnly, Model::OpenCodestralMamba)
            .unwrap();
        assert_eq!(config.model, Model::OpenCodestralMamba);
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(400));
        assert!(config.use_color);
    }

    #[test]
    fn args_custom() {
        let args = ChatArgs {
            mode: Some("image".to_string()),
            model: Some("pixtral-12b-2409".to_string()),
            image: Some("cat.jpg".to_string()),
            temperature: Some("0.2".to_string()),
            max_tokens: Some(1024),
            timeout: Some(5),
            latest_image_only: true,
            no_color: true,
        };
        assert_eq!(args.mode(), Ok(Some(Mode::TextAndImage)));
        assert_eq!(args.model(), Ok(Some(Model::Pixtral12b2409)));

        let config = args
            .into_config(Mode::TextAndImage, Model::Pixtral12b2409)
            .unwrap();
        assert_eq!(config.image_path, Some(PathBuf::from("cat.jpg")));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_tokens, Some(1024));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.image_context, ImageContext::LatestOnly);
        assert!(!config.use_color);
    }

    #[test]
    fn args_invalid_values() {
        let args = ChatArgs {
            mode: Some("video".to_string()),
            model: Some("gpt-4o".to_string()),
            ..ChatArgs::default()
        };
        assert!(matches!(args.mode(), Err(ChatArgsError::InvalidMode(_))));
        assert_eq!(
            args.model(),
            Err(ChatArgsError::InvalidModel("gpt-4o".to_string()))
        );

        for bad in ["3.0", "warm", "-0.1"] {
            let args = ChatArgs {
                temperature: Some(bad.to_string()),
                ..ChatArgs::default()
            };
            assert_eq!(
                args.into_config(Mode::TextOnly, Model::MistralSmallLatest)
                    .unwrap_err(),
                ChatArgsError::InvalidTemperature(bad.to_string())
            );
        }
    }

    #[test]
    fn conflicting_mode_and_model_fail_validation() {
        let args = ChatArgs {
            mode: Some("text".to_string()),
            model: Some("pixtral-12b-2409".to_string()),
            ..ChatArgs::default()
        };
        let mode = args.mode().unwrap().unwrap();
        let model = args.model().unwrap().unwrap();
        let config = args.into_config(mode, model).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.is_invalid_model_for_mode());
        assert_eq!(
            err.to_string(),
            Error::invalid_model_for_mode(Model::Pixtral12b2409, Mode::TextOnly).to_string()
        );
    }

    #[test]
    fn switching_keeps_settings() {
        let config = ChatConfig::default()
            .with_temperature(None)
            .with_max_tokens(Some(99))
            .without_color();
        let switched = config.switched_to(Mode::TextAndImage, Model::Pixtral12b2409);
        assert_eq!(switched.mode, Mode::TextAndImage);
        assert_eq!(switched.model, Model::Pixtral12b2409);
        assert_eq!(switched.temperature, None);
        assert_eq!(switched.max_tokens, Some(99));
        assert!(!switched.use_color);
    }
}
