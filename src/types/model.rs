use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a completion model identifier.
///
/// This can be a predefined model version or a custom string value for
/// OpenAI-compatible services that expose their own model names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for compatible services or private models)
    Custom(String),
}

/// Known completion model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Davinci, third generation instruct model
    #[serde(rename = "text-davinci-003")]
    TextDavinci003,

    /// Davinci, second generation instruct model
    #[serde(rename = "text-davinci-002")]
    TextDavinci002,

    /// Davinci, first generation instruct model
    #[serde(rename = "text-davinci-001")]
    TextDavinci001,

    /// Curie instruct model
    #[serde(rename = "text-curie-001")]
    TextCurie001,

    /// Babbage instruct model
    #[serde(rename = "text-babbage-001")]
    TextBabbage001,

    /// Ada instruct model
    #[serde(rename = "text-ada-001")]
    TextAda001,

    /// Base babbage model
    #[serde(rename = "babbage")]
    Babbage,

    /// Base davinci model
    #[serde(rename = "davinci")]
    Davinci,

    /// Base ada model
    #[serde(rename = "ada")]
    Ada,

    /// Base curie model
    #[serde(rename = "curie")]
    Curie,

    /// Curie instruct beta
    #[serde(rename = "curie-instruct-beta")]
    CurieInstructBeta,

    /// Davinci instruct beta
    #[serde(rename = "davinci-instruct-beta")]
    DavinciInstructBeta,

    /// Codex, second generation davinci model
    #[serde(rename = "code-davinci-002")]
    CodeDavinci002,

    /// Codex cushman model
    #[serde(rename = "code-cushman-001")]
    CodeCushman001,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::TextDavinci003 => write!(f, "text-davinci-003"),
            KnownModel::TextDavinci002 => write!(f, "text-davinci-002"),
            KnownModel::TextDavinci001 => write!(f, "text-davinci-001"),
            KnownModel::TextCurie001 => write!(f, "text-curie-001"),
            KnownModel::TextBabbage001 => write!(f, "text-babbage-001"),
            KnownModel::TextAda001 => write!(f, "text-ada-001"),
            KnownModel::Babbage => write!(f, "babbage"),
            KnownModel::Davinci => write!(f, "davinci"),
            KnownModel::Ada => write!(f, "ada"),
            KnownModel::Curie => write!(f, "curie"),
            KnownModel::CurieInstructBeta => write!(f, "curie-instruct-beta"),
            KnownModel::DavinciInstructBeta => write!(f, "davinci-instruct-beta"),
            KnownModel::CodeDavinci002 => write!(f, "code-davinci-002"),
            KnownModel::CodeCushman001 => write!(f, "code-cushman-001"),
        }
    }
}

impl FromStr for KnownModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-davinci-003" => Ok(KnownModel::TextDavinci003),
            "text-davinci-002" => Ok(KnownModel::TextDavinci002),
            "text-davinci-001" => Ok(KnownModel::TextDavinci001),
            "text-curie-001" => Ok(KnownModel::TextCurie001),
            "text-babbage-001" => Ok(KnownModel::TextBabbage001),
            "text-ada-001" => Ok(KnownModel::TextAda001),
            "babbage" => Ok(KnownModel::Babbage),
            "davinci" => Ok(KnownModel::Davinci),
            "ada" => Ok(KnownModel::Ada),
            "curie" => Ok(KnownModel::Curie),
            "curie-instruct-beta" => Ok(KnownModel::CurieInstructBeta),
            "davinci-instruct-beta" => Ok(KnownModel::DavinciInstructBeta),
            "code-davinci-002" => Ok(KnownModel::CodeDavinci002),
            "code-cushman-001" => Ok(KnownModel::CodeCushman001),
            _ => Err(format!("unknown model: {s}")),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    /// Parses a model identifier, falling back to `Model::Custom` for names
    /// that are not in the known set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<KnownModel>()
            .map(Model::Known)
            .unwrap_or_else(|_| Model::Custom(s.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        s.parse().expect("model parsing is infallible")
    }
}
