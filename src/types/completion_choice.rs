use serde::{Deserialize, Serialize};

/// One ranked completion returned by the service.
///
/// The service may return several choices per request; callers that want a
/// single answer take the choice at index 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    /// The generated text.  The service is not guaranteed to include this
    /// field, so consumers treat its absence as a failed completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// The position of this choice in the ranked list.
    #[serde(default)]
    pub index: u32,

    /// Log-probability details, present only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<serde_json::Value>,

    /// Why generation stopped ("stop", "length", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl CompletionChoice {
    /// Create a choice carrying only text, for construction in tests and
    /// defaults.
    pub fn new_with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            index: 0,
            logprobs: None,
            finish_reason: None,
        }
    }

    /// Set the finish reason.
    pub fn with_finish_reason(mut self, finish_reason: impl Into<String>) -> Self {
        self.finish_reason = Some(finish_reason.into());
        self
    }

    /// This choice as a JSON object with the `text` field removed, leaving
    /// only auxiliary metadata.
    pub fn metadata(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(object) = value.as_object_mut() {
            object.remove("text");
        }
        value
    }
}
