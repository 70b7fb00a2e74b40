use serde::{Deserialize, Serialize};

/// Token usage information for a completion call.
///
/// The service bills and rate-limits by token counts, as tokens represent the
/// underlying cost to its systems.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// The number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// The number of tokens in the generated completion.
    #[serde(default)]
    pub completion_tokens: u32,

    /// The total number of tokens consumed by the request.
    pub total_tokens: u32,
}

impl Usage {
    /// Create a new `Usage` with the given prompt and completion tokens.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn usage_totals() {
        let usage = Usage::new(7, 35);
        assert_eq!(usage.total_tokens, 42);

        let json = to_value(usage).unwrap();
        assert_eq!(
            json,
            json!({
                "prompt_tokens": 7,
                "completion_tokens": 35,
                "total_tokens": 42
            })
        );
    }

    #[test]
    fn usage_deserialization_without_completion_tokens() {
        let json = json!({
            "prompt_tokens": 5,
            "total_tokens": 5
        });

        let usage: Usage = serde_json::from_value(json).unwrap();
        assert_eq!(usage.prompt_tokens, 5);
        assert_eq!(usage.completion_tokens, 0);
        assert_eq!(usage.total_tokens, 5);
    }
}
