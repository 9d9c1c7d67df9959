use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ContentPart, EncodedImage};

/// The content of a message, which can be either a string or an array of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageParamContent {
    /// A simple string content.
    String(String),

    /// An ordered array of text and image parts.
    Parts(Vec<ContentPart>),
}

impl MessageParamContent {
    /// Returns the concatenated text of this content, skipping images.
    pub fn text(&self) -> String {
        match self {
            MessageParamContent::String(text) => text.clone(),
            MessageParamContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Returns the number of image parts.
    pub fn image_count(&self) -> usize {
        match self {
            MessageParamContent::String(_) => 0,
            MessageParamContent::Parts(parts) => parts
                .iter()
                .filter(|part| matches!(part, ContentPart::ImageUrl { .. }))
                .count(),
        }
    }
}

/// One role-tagged entry of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageParam {
    /// The role of the message.
    pub role: MessageRole,

    /// The content of the message.
    pub content: MessageParamContent,
}

/// Role type for a message parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl MessageParam {
    /// Create a new `MessageParam` with the given content and role.
    pub fn new(content: MessageParamContent, role: MessageRole) -> Self {
        Self { role, content }
    }

    /// Create a new user `MessageParam` with a string content.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageParamContent::String(content.into()), MessageRole::User)
    }

    /// Create a new assistant `MessageParam` with a string content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(
            MessageParamContent::String(content.into()),
            MessageRole::Assistant,
        )
    }

    /// Create a user message carrying text followed by an image.
    pub fn user_with_image(text: impl Into<String>, image: &EncodedImage) -> Self {
        Self::new(
            MessageParamContent::Parts(vec![ContentPart::text(text), ContentPart::image(image)]),
            MessageRole::User,
        )
    }
}

impl From<&str> for MessageParam {
    fn from(content: &str) -> Self {
        Self::user(content)
    }
}

impl From<String> for MessageParam {
    fn from(content: String) -> Self {
        Self::user(content)
    }
}
