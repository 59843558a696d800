//! Twitter accessor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tweetkit_core::ExceptionSettings;
use tweetkit_telemetry::default_redact_fields;

/// Configuration for the Twitter accessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// OAuth 2.0 Bearer Token (app-only auth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// Base URL for the REST API (default: https://api.twitter.com)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for media uploads (default: https://upload.twitter.com)
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Exception handler policy
    #[serde(default)]
    pub exceptions: ExceptionSettings,

    /// Query parameters masked in request and failure logs
    #[serde(default = "default_redact_fields")]
    pub redact_fields: Vec<String>,
}

fn default_api_url() -> String {
    "https://api.twitter.com".into()
}

fn default_upload_url() -> String {
    "https://upload.twitter.com".into()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            timeout: default_timeout(),
            exceptions: ExceptionSettings::default(),
            redact_fields: default_redact_fields(),
        }
    }
}

impl TwitterConfig {
    /// Point both the REST and the upload endpoints at `base_url`.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.upload_url.clone_from(&base_url);
        self.api_url = base_url;
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the exception handler policy.
    #[must_use]
    pub const fn with_exceptions(mut self, exceptions: ExceptionSettings) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Mask additional query parameters in logs, on top of the defaults.
    #[must_use]
    pub fn with_redact_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.redact_fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TwitterConfig::default();

        assert_eq!(config.api_url, "https://api.twitter.com");
        assert_eq!(config.upload_url, "https://upload.twitter.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.bearer_token.is_none());
        assert!(config.exceptions.swallow_web_exceptions);
        assert!(config.exceptions.log_exceptions);
        assert!(config.redact_fields.contains(&"token".to_string()));
    }

    #[test]
    fn test_with_redact_fields_keeps_defaults() {
        let config = TwitterConfig::default().with_redact_fields(["api_key"]);

        assert!(config.redact_fields.contains(&"api_key".to_string()));
        assert!(config.redact_fields.contains(&"password".to_string()));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TwitterConfig = serde_json::from_str(
            r#"{"bearer_token": "abc", "timeout": 5, "exceptions": {"swallow_web_exceptions": false}}"#,
        )
        .unwrap();

        assert_eq!(config.bearer_token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_url, "https://api.twitter.com");
        assert!(!config.exceptions.swallow_web_exceptions);
        assert!(config.exceptions.log_exceptions);
        assert_eq!(config.redact_fields, default_redact_fields());
    }

    #[test]
    fn test_serialize_timeout_as_seconds() {
        let config = TwitterConfig::default().with_timeout(Duration::from_secs(12));
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["timeout"], 12);
        assert!(json.get("bearer_token").is_none());
    }

    #[test]
    fn test_with_base_url_sets_both_endpoints() {
        let config = TwitterConfig::default().with_base_url("http://127.0.0.1:9000");

        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.upload_url, "http://127.0.0.1:9000");
    }
}
