use serde::{Deserialize, Serialize};

use crate::types::{CompletionChoice, Model, Usage};

/// A full structured response from the completion service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    /// Unique identifier for the completion.
    pub id: String,

    /// Object type, always "text_completion" from the reference service.
    pub object: String,

    /// Unix timestamp of when the completion was created.
    pub created: u64,

    /// The model that produced the completion.
    pub model: Model,

    /// The ranked completion choices.  May be empty; consumers treat an empty
    /// list as a failed completion.
    pub choices: Vec<CompletionChoice>,

    /// Token accounting for the request, when the service reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Completion {
    /// The choice at index 0, if any.
    pub fn first_choice(&self) -> Option<&CompletionChoice> {
        self.choices.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "id": "cmpl-abc123",
            "object": "text_completion",
            "created": 1672531200,
            "model": "text-davinci-003",
            "choices": [
                {
                    "text": "\n\nNegative.",
                    "index": 0,
                    "logprobs": null,
                    "finish_reason": "stop"
                }
            ],
            "usage": {
                "prompt_tokens": 5,
                "completion_tokens": 3,
                "total_tokens": 8
            }
        })
    }

    #[test]
    fn deserializes_service_response() {
        let completion: Completion = serde_json::from_value(sample_body()).unwrap();
        assert_eq!(completion.id, "cmpl-abc123");
        assert_eq!(completion.model, Model::Known(KnownModel::TextDavinci003));
        assert_eq!(completion.choices.len(), 1);
        assert_eq!(
            completion.first_choice().and_then(|c| c.text.as_deref()),
            Some("\n\nNegative.")
        );
        assert_eq!(completion.usage.unwrap().total_tokens, 8);
    }

    #[test]
    fn first_choice_of_empty_list_is_none() {
        let mut body = sample_body();
        body["choices"] = json!([]);
        let completion: Completion = serde_json::from_value(body).unwrap();
        assert!(completion.first_choice().is_none());
    }
}
