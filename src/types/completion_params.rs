use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Model;

/// Parameters for a completion request.
///
/// This is the single request-ready mapping assembled by configuration
/// resolution and mutated by live `:set` edits.  `prompt` and `model` are
/// required on the wire; the sampling knobs are optional and omitted from the
/// payload when unset.
///
/// A configuration file may embed an `api_key` field.  Credential resolution
/// takes it out before the first request, and the field is never serialized,
/// so it cannot leak into a request body or a rendered configuration view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionParams {
    /// The model that will complete the prompt.
    pub model: Model,

    /// The text to complete.
    pub prompt: String,

    /// Amount of randomness injected into sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// The maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Penalty against repeating tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Penalty against repeating topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Credential embedded in a configuration file.  Consumed by credential
    /// resolution; never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

/// The parameter names `set` recognizes, with their declared types.
const RECOGNIZED_KEYS: &[(&str, &str)] = &[
    ("model", "string"),
    ("prompt", "string"),
    ("temperature", "float"),
    ("max_tokens", "int"),
    ("top_p", "float"),
    ("frequency_penalty", "float"),
    ("presence_penalty", "float"),
];

impl CompletionParams {
    /// Create a new `CompletionParams` with the two required keys.
    pub fn new(model: impl Into<Model>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
            api_key: None,
        }
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the nucleus sampling threshold.
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the frequency penalty.
    pub fn with_frequency_penalty(mut self, frequency_penalty: f64) -> Self {
        self.frequency_penalty = Some(frequency_penalty);
        self
    }

    /// Set the presence penalty.
    pub fn with_presence_penalty(mut self, presence_penalty: f64) -> Self {
        self.presence_penalty = Some(presence_penalty);
        self
    }

    /// Coerce `value` to the declared type of the parameter named `key` and
    /// write it into the mapping.
    ///
    /// Recognized keys and their types: `model` and `prompt` are strings;
    /// `temperature`, `top_p`, `frequency_penalty`, and `presence_penalty`
    /// are floats; `max_tokens` is a positive integer.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unrecognized key or a value that
    /// does not coerce; the mapping is left unchanged in both cases.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "model" => {
                self.model = value.parse().expect("model parsing is infallible");
            }
            "prompt" => {
                self.prompt = value.to_string();
            }
            "temperature" => self.temperature = Some(parse_float(key, value)?),
            "top_p" => self.top_p = Some(parse_float(key, value)?),
            "frequency_penalty" => self.frequency_penalty = Some(parse_float(key, value)?),
            "presence_penalty" => self.presence_penalty = Some(parse_float(key, value)?),
            "max_tokens" => {
                self.max_tokens = Some(value.parse::<u32>().map_err(|_| {
                    Error::validation("expects a positive integer", Some(key.to_string()))
                })?);
            }
            _ => {
                let known: Vec<&str> = RECOGNIZED_KEYS.iter().map(|(name, _)| *name).collect();
                return Err(Error::validation(
                    format!("not a recognized parameter (recognized: {})", known.join(", ")),
                    Some(key.to_string()),
                ));
            }
        }
        Ok(())
    }

    /// The recognized parameter names, for help and error text.
    pub fn recognized_keys() -> impl Iterator<Item = &'static str> {
        RECOGNIZED_KEYS.iter().map(|(name, _)| *name)
    }
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| Error::validation("expects a float", Some(key.to_string())))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(Error::validation("expects a finite float", Some(key.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use serde_json::json;

    fn params() -> CompletionParams {
        CompletionParams::new(KnownModel::TextDavinci003, "say nothing")
    }

    #[test]
    fn serializes_only_present_keys() {
        let json = serde_json::to_value(params().with_temperature(0.7)).unwrap();
        assert_eq!(
            json,
            json!({
                "model": "text-davinci-003",
                "prompt": "say nothing",
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn api_key_is_never_serialized() {
        let mut p = params();
        p.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn deserializes_embedded_api_key() {
        let p: CompletionParams = serde_json::from_value(json!({
            "model": "text-davinci-003",
            "prompt": "hello",
            "api_key": "sk-from-file"
        }))
        .unwrap();
        assert_eq!(p.api_key.as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn set_coerces_floats() {
        let mut p = params();
        p.set("temperature", "0.5").unwrap();
        assert_eq!(p.temperature, Some(0.5));

        p.set("top_p", "0.9").unwrap();
        assert_eq!(p.top_p, Some(0.9));
    }

    #[test]
    fn set_coerces_ints_and_strings() {
        let mut p = params();
        p.set("max_tokens", "128").unwrap();
        assert_eq!(p.max_tokens, Some(128));

        p.set("model", "curie").unwrap();
        assert_eq!(p.model, Model::Known(KnownModel::Curie));

        p.set("prompt", "new prompt").unwrap();
        assert_eq!(p.prompt, "new prompt");
    }

    #[test]
    fn set_rejects_unrecognized_key() {
        let mut p = params();
        let before = p.clone();
        let err = p.set("unknownKey", "5").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(p, before);
    }

    #[test]
    fn set_rejects_bad_coercion() {
        let mut p = params();
        let before = p.clone();
        assert!(p.set("temperature", "warm").unwrap_err().is_validation());
        assert!(p.set("max_tokens", "-3").unwrap_err().is_validation());
        assert!(p.set("max_tokens", "many").unwrap_err().is_validation());
        assert_eq!(p, before);
    }
}
