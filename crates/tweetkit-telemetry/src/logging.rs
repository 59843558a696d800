//! Structured logging with JSON output and sensitive data redaction.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};
use url::Url;

use crate::{TelemetryConfig, TelemetryError};

const REDACTED: &str = "[REDACTED]";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub(crate) fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().compact().with_span_events(FmtSpan::CLOSE))
            .try_init()
    };

    installed.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

fn is_sensitive(key: &str, fields: &[String]) -> bool {
    let key = key.to_lowercase();
    fields.iter().any(|f| key.contains(&f.to_lowercase()))
}

/// Redact sensitive fields from a JSON value.
#[must_use]
pub fn redact_sensitive(value: &serde_json::Value, fields: &[String]) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (key, val) in map {
                if is_sensitive(key, fields) {
                    result.insert(key.clone(), serde_json::Value::String(REDACTED.to_string()));
                } else {
                    result.insert(key.clone(), redact_sensitive(val, fields));
                }
            }
            serde_json::Value::Object(result)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(|v| redact_sensitive(v, fields)).collect())
        }
        other => other.clone(),
    }
}

/// Redact sensitive query parameters of a URL.
///
/// Strings that do not parse as URLs are returned unchanged.
#[must_use]
pub fn redact_url(raw: &str, fields: &[String]) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if url.query().is_none() {
        return raw.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if is_sensitive(&k, fields) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<String> {
        crate::default_redact_fields()
    }

    #[test]
    fn test_redact_sensitive_nested() {
        let value = json!({
            "user": "jack",
            "access_token": "tok-xyz",
            "data": {
                "Authorization": "Bearer abc",
                "name": "test"
            },
            "items": [{"password": "p1"}, {"safe": 1}]
        });

        let redacted = redact_sensitive(&value, &fields());

        assert_eq!(redacted["user"], "jack");
        assert_eq!(redacted["access_token"], "[REDACTED]");
        assert_eq!(redacted["data"]["Authorization"], "[REDACTED]");
        assert_eq!(redacted["data"]["name"], "test");
        assert_eq!(redacted["items"][0]["password"], "[REDACTED]");
        assert_eq!(redacted["items"][1]["safe"], 1);
    }

    #[test]
    fn test_redact_primitive_value() {
        let value = json!("just a string");
        assert_eq!(redact_sensitive(&value, &fields()), "just a string");
    }

    #[test]
    fn test_redact_url_query_params() {
        let redacted = redact_url(
            "https://api.twitter.com/1.1/blocks/create.json?user_id=42&oauth_token=abc",
            &fields(),
        );

        assert!(redacted.contains("user_id=42"));
        assert!(redacted.contains("oauth_token=%5BREDACTED%5D"));
        assert!(!redacted.contains("abc"));
    }

    #[test]
    fn test_redact_url_without_query() {
        let url = "https://api.twitter.com/1.1/account/verify_credentials.json";

        assert_eq!(redact_url(url, &fields()), url);
    }

    #[test]
    fn test_redact_url_not_a_url() {
        assert_eq!(redact_url("not a url", &fields()), "not a url");
    }
}
