//! Credential resolution.
//!
//! The access token is resolved once at startup, in precedence order: a key
//! embedded in the resolved parameters (stripped on the way out), an
//! explicitly supplied key value, a key file, then the `OPENAI_API_KEY`
//! environment variable.  Absence of all four is fatal; there is no
//! recoverable path without a credential.

use std::env;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::CompletionParams;

/// Environment variable consulted when no other credential source resolves.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Resolve the access token, stripping any key embedded in `params`.
///
/// After this returns, `params.api_key` is guaranteed to be `None` whichever
/// path resolved, so the credential can never ride along in the request
/// parameters.
///
/// # Errors
///
/// Returns an authentication error when no source yields a key, and an I/O
/// error when `key_path` is supplied but unreadable.
pub fn resolve(
    params: &mut CompletionParams,
    explicit: Option<&str>,
    key_path: Option<&Path>,
) -> Result<String> {
    let from_env = env::var(API_KEY_ENV).ok();
    resolve_with_env(params, explicit, key_path, from_env)
}

fn resolve_with_env(
    params: &mut CompletionParams,
    explicit: Option<&str>,
    key_path: Option<&Path>,
    from_env: Option<String>,
) -> Result<String> {
    if let Some(key) = params.api_key.take() {
        return Ok(key);
    }
    if let Some(key) = explicit {
        return Ok(key.to_string());
    }
    if let Some(path) = key_path {
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::io(format!("failed to read key file {}", path.display()), err)
        })?;
        return Ok(contents.trim().to_string());
    }
    if let Some(key) = from_env {
        return Ok(key);
    }
    Err(Error::authentication(format!(
        "API key not found: provide one in the configuration, with --key or --key-path, or via {API_KEY_ENV}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use std::io::Write;

    fn params() -> CompletionParams {
        CompletionParams::new(KnownModel::TextDavinci003, "hello")
    }

    #[test]
    fn embedded_key_wins_and_is_stripped() {
        let mut p = params();
        p.api_key = Some("sk-embedded".to_string());

        let key =
            resolve_with_env(&mut p, Some("sk-explicit"), None, Some("sk-env".to_string()))
                .unwrap();
        assert_eq!(key, "sk-embedded");
        assert!(p.api_key.is_none());
    }

    #[test]
    fn explicit_key_wins_over_file_and_env() {
        let mut p = params();
        let key = resolve_with_env(
            &mut p,
            Some("sk-explicit"),
            Some(Path::new("/does/not/matter")),
            Some("sk-env".to_string()),
        )
        .unwrap();
        assert_eq!(key, "sk-explicit");
        assert!(p.api_key.is_none());
    }

    #[test]
    fn key_file_contents_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  sk-from-file  ").unwrap();

        let mut p = params();
        let key = resolve_with_env(&mut p, None, Some(file.path()), None).unwrap();
        assert_eq!(key, "sk-from-file");
    }

    #[test]
    fn unreadable_key_file_is_an_io_error() {
        let mut p = params();
        let err =
            resolve_with_env(&mut p, None, Some(Path::new("/definitely/not/here.key")), None)
                .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn environment_is_the_last_resort() {
        let mut p = params();
        let key = resolve_with_env(&mut p, None, None, Some("sk-env".to_string())).unwrap();
        assert_eq!(key, "sk-env");
    }

    #[test]
    fn nothing_resolves_is_fatal() {
        let mut p = params();
        let err = resolve_with_env(&mut p, None, None, None).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn no_path_leaves_a_credential_in_params() {
        for (explicit, env) in [(Some("sk-x"), None), (None, Some("sk-env".to_string()))] {
            let mut p = params();
            p.api_key = Some("sk-embedded".to_string());
            resolve_with_env(&mut p, explicit, None, env).unwrap();
            assert!(p.api_key.is_none());
        }
    }
}
