//! Session state for the interactive loop.
//!
//! One [`Session`] exists per process.  It owns the resolved request
//! parameters, the last structured response, the active color scheme, and the
//! interactive prompt string, and it is mutated only by the thread running
//! the loop.

use crate::client::Completions;
use crate::error::{Error, Result};
use crate::repl::render::ColorScheme;
use crate::types::{Completion, CompletionChoice, CompletionParams};

/// Process-wide mutable record of the interactive session.
pub struct Session {
    client: Completions,
    params: CompletionParams,
    last_response: Option<Completion>,
    scheme: ColorScheme,
    prompt_text: String,
}

impl Session {
    /// Creates a new session from the startup-resolved pieces.
    pub fn new(
        client: Completions,
        params: CompletionParams,
        scheme: ColorScheme,
        prompt_text: String,
    ) -> Self {
        Self {
            client,
            params,
            last_response: None,
            scheme,
            prompt_text,
        }
    }

    /// Sends one chat turn to the completion service.
    ///
    /// The text is substituted into the `prompt` key of the live parameters
    /// and a single request is made.  On success the full structured response
    /// is recorded for later inspection and the first choice is returned.
    ///
    /// # Errors
    ///
    /// Returns the client's error on any transport or service failure, and a
    /// validation error when the response has no choices or the first choice
    /// carries no text (both shapes are failure-equivalent).  The recorded
    /// last response is left unchanged on every error path.
    pub async fn complete(&mut self, text: &str) -> Result<CompletionChoice> {
        self.params.prompt = text.to_string();
        let completion = self.client.complete(&self.params).await?;

        let choice = completion.first_choice().cloned().ok_or_else(|| {
            Error::validation("response contained no choices", Some("choices".to_string()))
        })?;
        if choice.text.is_none() {
            return Err(Error::validation(
                "first choice carried no text",
                Some("text".to_string()),
            ));
        }

        self.last_response = Some(completion);
        Ok(choice)
    }

    /// The last choice's metadata with its text stripped, or `None` if no
    /// response has been recorded yet.
    pub fn check(&self) -> Option<serde_json::Value> {
        self.last_response
            .as_ref()
            .and_then(Completion::first_choice)
            .map(CompletionChoice::metadata)
    }

    /// The last full structured response, pretty-printed, or `None` if no
    /// response has been recorded yet.
    pub fn response_pretty(&self) -> Option<String> {
        self.last_response
            .as_ref()
            .and_then(|response| serde_json::to_string_pretty(response).ok())
    }

    /// The current resolved parameter mapping, pretty-printed.  The
    /// credential can never appear here: it is stripped at resolution and the
    /// field is not serializable.
    pub fn configurations_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.params)
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Coerce and write one parameter into the live mapping.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unrecognized key or a value that
    /// does not coerce; the mapping is unchanged in both cases.
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<()> {
        self.params.set(key, value)
    }

    /// The live request parameters.
    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    /// The recorded last response, if any.
    pub fn last_response(&self) -> Option<&Completion> {
        self.last_response.as_ref()
    }

    /// The active color scheme.
    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    /// The active color scheme, for mutation by color-setting commands.
    pub fn scheme_mut(&mut self) -> &mut ColorScheme {
        &mut self.scheme
    }

    /// The interactive prompt string.
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Replaces the interactive prompt string.
    pub fn set_prompt_text(&mut self, prompt_text: String) {
        self.prompt_text = prompt_text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_against(server_uri: String) -> Session {
        let client =
            Completions::with_options("sk-test".to_string(), Some(server_uri), None).unwrap();
        let params = CompletionParams::new(KnownModel::TextDavinci003, "initial prompt");
        Session::new(
            client,
            params,
            ColorScheme::default(),
            "davinci>> ".to_string(),
        )
    }

    fn one_choice_body() -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "created": 1,
            "model": "text-davinci-003",
            "choices": [
                {"text": "\n\nFour.", "index": 0, "logprobs": null, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6}
        })
    }

    #[tokio::test]
    async fn successful_turn_records_response_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_choice_body()))
            .mount(&server)
            .await;

        let mut session = session_against(server.uri());
        let choice = session.complete("what is two plus two").await.unwrap();

        assert_eq!(choice.text.as_deref(), Some("\n\nFour."));
        assert_eq!(choice.index, 0);
        // The prompt was substituted into the live parameters.
        assert_eq!(session.params().prompt, "what is two plus two");
        // The full response is recorded, and the returned payload equals
        // choices[0] of it.
        let recorded = session.last_response().unwrap();
        assert_eq!(recorded.first_choice(), Some(&choice));
    }

    #[tokio::test]
    async fn failed_turn_leaves_last_response_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_choice_body()))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "the server had an error", "type": "server_error"}
            })))
            .mount(&server)
            .await;

        let mut session = session_against(server.uri());
        session.complete("first").await.unwrap();
        let before = session.last_response().cloned();

        let err = session.complete("second").await.unwrap_err();
        assert!(err.is_server_error());
        assert!(err.to_string().contains("the server had an error"));
        assert_eq!(session.last_response().cloned(), before);
    }

    #[tokio::test]
    async fn empty_choices_are_failure_equivalent() {
        let server = MockServer::start().await;
        let mut body = one_choice_body();
        body["choices"] = json!([]);
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let mut session = session_against(server.uri());
        let err = session.complete("anything").await.unwrap_err();
        assert!(err.is_validation());
        assert!(session.last_response().is_none());
    }

    #[tokio::test]
    async fn missing_text_is_failure_equivalent() {
        let server = MockServer::start().await;
        let mut body = one_choice_body();
        body["choices"] = json!([{"index": 0, "finish_reason": "stop"}]);
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let mut session = session_against(server.uri());
        let err = session.complete("anything").await.unwrap_err();
        assert!(err.is_validation());
        assert!(session.last_response().is_none());
    }

    #[test]
    fn check_is_a_silent_noop_before_any_response() {
        let session = session_against("http://127.0.0.1:9".to_string());
        assert!(session.check().is_none());
        assert!(session.response_pretty().is_none());
    }

    #[tokio::test]
    async fn check_strips_text_after_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(one_choice_body()))
            .mount(&server)
            .await;

        let mut session = session_against(server.uri());
        session.complete("hello").await.unwrap();

        let metadata = session.check().unwrap();
        assert!(metadata.get("text").is_none());
        assert_eq!(metadata.get("finish_reason"), Some(&json!("stop")));
    }

    #[test]
    fn set_parameter_coerces_to_declared_types() {
        let mut session = session_against("http://127.0.0.1:9".to_string());
        session.set_parameter("temperature", "0.5").unwrap();

        let rendered = session.configurations_pretty();
        // Rendered as a JSON number, not a string.
        assert!(rendered.contains("\"temperature\": 0.5"));
        assert!(!rendered.contains("\"temperature\": \"0.5\""));
    }

    #[test]
    fn set_parameter_rejects_unknown_keys_without_mutating() {
        let mut session = session_against("http://127.0.0.1:9".to_string());
        let before = session.params().clone();
        let err = session.set_parameter("unknownKey", "5").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.params(), &before);
    }

    #[test]
    fn configurations_never_show_a_credential() {
        let server_uri = "http://127.0.0.1:9".to_string();
        let client = Completions::with_options("sk-test".to_string(), Some(server_uri), None)
            .unwrap();
        let mut params = CompletionParams::new(KnownModel::TextDavinci003, "hi");
        params.api_key = Some("sk-leaky".to_string());
        let session = Session::new(
            client,
            params,
            ColorScheme::default(),
            "davinci>> ".to_string(),
        );
        assert!(!session.configurations_pretty().contains("sk-leaky"));
    }
}
