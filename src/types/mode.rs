use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Model;

/// Whether a conversation is text-only or text-plus-image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Plain text turns.
    #[default]
    #[serde(rename = "text")]
    TextOnly,

    /// Every user turn carries text and one image.
    #[serde(rename = "image")]
    TextAndImage,
}

impl Mode {
    /// The models that may be used in this mode.
    pub fn allowed_models(&self) -> &'static [Model] {
        match self {
            Mode::TextOnly => &[
                Model::MistralSmallLatest,
                Model::OpenMistralNemo,
                Model::OpenCodestralMamba,
            ],
            Mode::TextAndImage => &[Model::Pixtral12b2409],
        }
    }

    /// Returns true if `model` is on this mode's allow-list.
    pub fn allows(&self, model: Model) -> bool {
        self.allowed_models().contains(&model)
    }

    /// The model used when none is selected.
    pub fn default_model(&self) -> Model {
        self.allowed_models()[0]
    }

    /// Returns true if user turns in this mode must carry an image.
    pub fn requires_image(&self) -> bool {
        matches!(self, Mode::TextAndImage)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::TextOnly => write!(f, "text"),
            Mode::TextAndImage => write!(f, "image"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Parse a mode from its name or its menu number.
    ///
    /// Accepts "text" or "1", and "image" or "2" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "1" => Ok(Mode::TextOnly),
            "image" | "2" => Ok(Mode::TextAndImage),
            _ => Err(format!("Invalid mode: {}. Valid options: text, image", s)),
        }
    }
}
