use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::Mode;

/// A Mistral model this client is allowed to talk to.
///
/// The list is closed: names outside of it fail to parse rather than
/// falling back to a custom identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// Mistral Small (latest version)
    #[serde(rename = "mistral-small-latest")]
    MistralSmallLatest,

    /// Mistral NeMo
    #[serde(rename = "open-mistral-nemo")]
    OpenMistralNemo,

    /// Codestral Mamba
    #[serde(rename = "open-codestral-mamba")]
    OpenCodestralMamba,

    /// Pixtral 12B (2024-09 version)
    #[serde(rename = "pixtral-12b-2409")]
    Pixtral12b2409,
}

impl Model {
    /// Every allow-listed model, text models first.
    pub const ALL: [Model; 4] = [
        Model::MistralSmallLatest,
        Model::OpenMistralNemo,
        Model::OpenCodestralMamba,
        Model::Pixtral12b2409,
    ];

    /// The identifier sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::MistralSmallLatest => "mistral-small-latest",
            Model::OpenMistralNemo => "open-mistral-nemo",
            Model::OpenCodestralMamba => "open-codestral-mamba",
            Model::Pixtral12b2409 => "pixtral-12b-2409",
        }
    }

    /// The mode whose allow-list contains this model.
    pub fn mode(&self) -> Mode {
        match self {
            Model::Pixtral12b2409 => Mode::TextAndImage,
            _ => Mode::TextOnly,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Model::ALL
            .into_iter()
            .find(|model| model.as_str() == trimmed)
            .ok_or_else(|| Error::unknown_model(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_serialization() {
        let json = serde_json::to_string(&Model::MistralSmallLatest).unwrap();
        assert_eq!(json, r#""mistral-small-latest""#);

        let json = serde_json::to_string(&Model::Pixtral12b2409).unwrap();
        assert_eq!(json, r#""pixtral-12b-2409""#);
    }

    #[test]
    fn model_deserialization() {
        let model: Model = serde_json::from_str(r#""open-codestral-mamba""#).unwrap();
        assert_eq!(model, Model::OpenCodestralMamba);

        assert!(serde_json::from_str::<Model>(r#""gpt-4o""#).is_err());
    }

    #[test]
    fn parse_round_trips_display() {
        for model in Model::ALL {
            assert_eq!(model.to_string().parse::<Model>().unwrap(), model);
        }
        assert_eq!(
            " open-mistral-nemo ".parse::<Model>().unwrap(),
            Model::OpenMistralNemo
        );
    }

    #[test]
    fn parse_unknown_model() {
        let err = "mistral-large-latest".parse::<Model>().unwrap_err();
        assert!(matches!(err, Error::UnknownModel { name } if name == "mistral-large-latest"));
    }

    #[test]
    fn model_modes() {
        assert_eq!(Model::MistralSmallLatest.mode(), Mode::TextOnly);
        assert_eq!(Model::OpenMistralNemo.mode(), Mode::TextOnly);
        assert_eq!(Model::OpenCodestralMamba.mode(), Mode::TextOnly);
        assert_eq!(Model::Pixtral12b2409.mode(), Mode::TextAndImage);
    }
}
