use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Usage;

/// Response body of a successful chat completion.
///
/// Only the fields the client reads are modelled; everything else the API
/// returns is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Completion identifier assigned by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Candidate replies; the first one is used.
    pub choices: Vec<Choice>,

    /// Token accounting, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// One candidate reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// The generated message.
    pub message: ChoiceMessage,

    /// Why generation stopped, e.g. "stop" or "length".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// The reply text.
    pub content: String,
}

/// The part of a completion the session keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The assistant's reply text.
    pub content: String,

    /// Token accounting, when reported.
    pub usage: Option<Usage>,
}

impl Reply {
    /// Create a reply without usage information.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

impl ChatCompletion {
    /// Parse a response body and extract `choices[0].message.content`.
    pub fn parse_reply(body: &str) -> Result<Reply> {
        let completion: ChatCompletion = serde_json::from_str(body).map_err(|e| {
            Error::malformed_response(format!("Failed to parse response: {}", e), Some(Box::new(e)))
        })?;
        completion.into_reply()
    }

    /// Take the first choice as the reply.
    pub fn into_reply(self) -> Result<Reply> {
        let usage = self.usage;
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed_response("response contained no choices", None))?;
        Ok(Reply {
            content: choice.message.content,
            usage,
        })
    }
}
