use serde::{Deserialize, Serialize};

use crate::types::{MessageParam, Model};

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionParams {
    /// The model that will complete the conversation.
    pub model: Model,

    /// The conversation so far, oldest first.
    pub messages: Vec<MessageParam>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatCompletionParams {
    /// Create request parameters with no sampling overrides.
    pub fn new(model: Model, messages: Vec<MessageParam>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token limit.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn minimal_params() {
        let params = ChatCompletionParams::new(
            Model::MistralSmallLatest,
            vec![MessageParam::user("Hello")],
        );
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "mistral-small-latest",
                "messages": [{"role": "user", "content": "Hello"}]
            })
        );
    }

    #[test]
    fn params_with_sampling() {
        let params = ChatCompletionParams::new(Model::OpenMistralNemo, vec![])
            .with_temperature(Some(0.5))
            .with_max_tokens(Some(400));
        assert_eq!(
            to_value(&params).unwrap(),
            json!({
                "model": "open-mistral-nemo",
                "messages": [],
                "temperature": 0.5,
                "max_tokens": 400
            })
        );
    }
}
