//! Shared utility functions for endpoint adapters.

use pl_domain::config::AuthConfig;
use pl_domain::error::{Error, Result};
use serde_json::Value;

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Every transport-level failure, timeouts included, maps to
/// [`Error::Network`]. The URL is stripped first because it may carry the
/// API key as a query parameter.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    let e = e.without_url();
    if e.is_timeout() {
        Error::Network(format!("request timed out: {e}"))
    } else {
        Error::Network(e.to_string())
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Uses `error.message` when the body is JSON and carries one, otherwise
/// falls back to `API Error: {status}`.
pub(crate) fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .filter(|m| !m.trim().is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("API Error: {status}"))
}

/// Resolve the API key from an [`AuthConfig`].
///
/// Precedence:
/// 1. `key` field (plaintext, warns)
/// 2. `env` field (reads environment variable)
/// 3. Error
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(ref key) = auth.key {
        tracing::warn!(
            "API key loaded from plaintext config field 'key'; \
             prefer 'env' instead"
        );
        return Ok(key.clone());
    }

    if let Some(ref env_var) = auth.env {
        return std::env::var(env_var).map_err(|_| {
            Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                env_var
            ))
        });
    }

    Err(Error::Auth(
        "no API key configured: set 'key' or 'env' in [provider.auth]".into(),
    ))
}

/// Redact the `key=` query parameter from a URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_from_json_body() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded"}}"#;
        assert_eq!(extract_error_message(429, body), "quota exceeded");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(extract_error_message(502, "<html>bad gateway</html>"), "API Error: 502");
        assert_eq!(extract_error_message(400, r#"{"error":{}}"#), "API Error: 400");
        assert_eq!(extract_error_message(400, r#"{"error":{"message":""}}"#), "API Error: 400");
    }

    #[test]
    fn redact_hides_key_only() {
        assert_eq!(
            redact_url_key("https://h/v1beta/models/m:generateContent?key=abc123&alt=sse"),
            "https://h/v1beta/models/m:generateContent?key=[REDACTED]&alt=sse"
        );
        assert_eq!(redact_url_key("https://h/no-key"), "https://h/no-key");
    }

    #[test]
    fn resolve_api_key_plaintext() {
        let auth = AuthConfig {
            key: Some("sk-test-123".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_env_var() {
        let var_name = "PL_TEST_RESOLVE_ENV_KEY_1234";
        std::env::set_var(var_name, "env-secret-value");
        let auth = AuthConfig {
            env: Some(var_name.into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_env_var_missing() {
        let auth = AuthConfig {
            env: Some("PL_TEST_NONEXISTENT_VAR_8888".into()),
            ..Default::default()
        };
        let err = resolve_api_key(&auth).unwrap_err();
        assert!(err.to_string().contains("PL_TEST_NONEXISTENT_VAR_8888"));
    }

    #[test]
    fn resolve_api_key_no_config() {
        let err = resolve_api_key(&AuthConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no API key configured"));
    }
}
