use serde::{Deserialize, Serialize};

use crate::types::{CompletionParams, Model};

/// A partial set of completion parameters.
///
/// Every field is optional.  `apply` overlays the fields that are set onto a
/// complete `CompletionParams`, leaving the rest untouched.  This is the
/// overlay rule used for per-invocation overrides: base first, template
/// second, later wins, and the template can never introduce a key the base
/// mapping does not declare.
///
/// # Example
///
/// ```
/// # use davinci::{CompletionParams, CompletionTemplate, KnownModel};
/// let template = CompletionTemplate::new().with_temperature(0.2);
/// let params = CompletionParams::new(KnownModel::TextDavinci003, "hello");
/// let params = template.apply(params);
///
/// assert_eq!(params.temperature, Some(0.2));
/// assert_eq!(params.prompt, "hello");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionTemplate {
    /// The model that will complete the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,

    /// The text to complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

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
}

impl CompletionTemplate {
    /// Create a new empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model field.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the prompt field.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the temperature field.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the max_tokens field.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the top_p field.
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the frequency_penalty field.
    pub fn with_frequency_penalty(mut self, frequency_penalty: f64) -> Self {
        self.frequency_penalty = Some(frequency_penalty);
        self
    }

    /// Set the presence_penalty field.
    pub fn with_presence_penalty(mut self, presence_penalty: f64) -> Self {
        self.presence_penalty = Some(presence_penalty);
        self
    }

    /// True if no field is set, in which case `apply` is the identity.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply this template to the given `CompletionParams`.
    ///
    /// Fields that are `Some` in the template override the corresponding
    /// fields in the params.  Fields that are `None` leave the params
    /// unchanged.
    pub fn apply(self, mut params: CompletionParams) -> CompletionParams {
        if let Some(model) = self.model {
            params.model = model;
        }
        if let Some(prompt) = self.prompt {
            params.prompt = prompt;
        }
        if let Some(temperature) = self.temperature {
            params.temperature = Some(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            params.max_tokens = Some(max_tokens);
        }
        if let Some(top_p) = self.top_p {
            params.top_p = Some(top_p);
        }
        if let Some(frequency_penalty) = self.frequency_penalty {
            params.frequency_penalty = Some(frequency_penalty);
        }
        if let Some(presence_penalty) = self.presence_penalty {
            params.presence_penalty = Some(presence_penalty);
        }
        params
    }
}
