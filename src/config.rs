//! Configuration resolution.
//!
//! A request payload starts from a base mapping, either a JSON configuration
//! file or the built-in sample template, and per-invocation overrides are
//! overlaid on top, later always winning.  The result is a complete,
//! request-ready [`CompletionParams`] handed to credential resolution.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{CompletionParams, CompletionTemplate, KnownModel};

/// The built-in default template: a fully-specified sample parameter set used
/// when no configuration file is supplied.
pub fn sample_params() -> CompletionParams {
    CompletionParams::new(
        KnownModel::TextDavinci003,
        "Briefly introduce yourself to a new user.",
    )
    .with_temperature(0.7)
    .with_max_tokens(256)
    .with_top_p(1.0)
    .with_frequency_penalty(0.0)
    .with_presence_penalty(0.0)
}

/// Resolve the request parameters for this invocation.
///
/// The base mapping comes from `file_config_path` when given, otherwise from
/// [`sample_params`].  `overrides` is then overlaid: keys it sets replace the
/// base values, keys it leaves unset keep them, and nothing outside the
/// recognized parameter set can be introduced.
///
/// # Errors
///
/// Any I/O or parse failure on the configuration file is returned with its
/// underlying cause.  The process cannot continue without a valid base
/// configuration, so callers treat this as fatal.
pub fn resolve(
    file_config_path: Option<&Path>,
    overrides: CompletionTemplate,
) -> Result<CompletionParams> {
    let base = match file_config_path {
        Some(path) => load_file(path)?,
        None => sample_params(),
    };
    Ok(overrides.apply(base))
}

fn load_file(path: &Path) -> Result<CompletionParams> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::io(
            format!("failed to read configuration file {}", path.display()),
            err,
        )
    })?;
    serde_json::from_str(&contents).map_err(|err| {
        Error::serialization(
            format!(
                "failed to parse configuration file {}: {err}",
                path.display()
            ),
            Some(Box::new(err)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Model;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file_and_no_overrides() {
        let params = resolve(None, CompletionTemplate::new()).unwrap();
        assert_eq!(params, sample_params());
    }

    #[test]
    fn sample_template_is_request_ready() {
        let params = sample_params();
        assert!(!params.prompt.is_empty());
        assert_eq!(params.model, Model::Known(KnownModel::TextDavinci003));
        assert_eq!(params.temperature, Some(0.7));
        assert_eq!(params.max_tokens, Some(256));
        assert_eq!(params.top_p, Some(1.0));
        assert_eq!(params.frequency_penalty, Some(0.0));
        assert_eq!(params.presence_penalty, Some(0.0));
        assert!(params.api_key.is_none());
    }

    #[test]
    fn overrides_replace_sample_values() {
        let overrides = CompletionTemplate::new()
            .with_model(KnownModel::TextAda001)
            .with_temperature(0.2);
        let params = resolve(None, overrides).unwrap();
        assert_eq!(params.model, Model::Known(KnownModel::TextAda001));
        assert_eq!(params.temperature, Some(0.2));
        // Keys without overrides keep the sample values.
        assert_eq!(params.max_tokens, Some(256));
    }

    #[test]
    fn file_config_becomes_the_base() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model": "curie", "prompt": "from the file", "max_tokens": 32}}"#
        )
        .unwrap();

        let params = resolve(Some(file.path()), CompletionTemplate::new()).unwrap();
        assert_eq!(params.model, Model::Known(KnownModel::Curie));
        assert_eq!(params.prompt, "from the file");
        assert_eq!(params.max_tokens, Some(32));
        assert_eq!(params.temperature, None);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model": "curie", "prompt": "from the file", "temperature": 0.9}}"#
        )
        .unwrap();

        let overrides = CompletionTemplate::new().with_temperature(0.1);
        let params = resolve(Some(file.path()), overrides).unwrap();
        assert_eq!(params.temperature, Some(0.1));
        assert_eq!(params.prompt, "from the file");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = resolve(
            Some(Path::new("/definitely/not/here.json")),
            CompletionTemplate::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn malformed_file_reports_the_cause() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not json").unwrap();

        let err = resolve(Some(file.path()), CompletionTemplate::new()).unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
        assert!(err.to_string().contains("failed to parse configuration file"));
    }

    #[test]
    fn file_with_embedded_api_key_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model": "ada", "prompt": "hi", "api_key": "sk-embedded"}}"#
        )
        .unwrap();

        let params = resolve(Some(file.path()), CompletionTemplate::new()).unwrap();
        assert_eq!(params.api_key.as_deref(), Some("sk-embedded"));
    }
}
