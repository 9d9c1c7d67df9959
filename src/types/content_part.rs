use serde::{Deserialize, Serialize};

use crate::types::EncodedImage;

/// One typed part of a multimodal message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A run of text.
    Text {
        /// The text itself.
        text: String,
    },

    /// An image, given as a data URL or a remote URL.
    ImageUrl {
        /// The image location.
        image_url: String,
    },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image part from an encoded image.
    pub fn image(image: &EncodedImage) -> Self {
        ContentPart::ImageUrl {
            image_url: image.as_str().to_string(),
        }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::ImageUrl { .. } => None,
        }
    }
}
