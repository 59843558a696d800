//! Translated failure of a remote call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::HttpMethod;

/// Status code used when no HTTP status or provider code could be resolved.
pub const UNKNOWN_STATUS_CODE: i32 = -1;

/// Provider error code returned when the rate limit is exceeded.
const RATE_LIMIT_EXCEEDED_CODE: i32 = 88;

/// Provider error codes returned for rejected credentials.
const AUTHENTICATION_CODES: [i32; 2] = [32, 89];

/// One `(code, message)` pair of the platform's error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Provider error code
    pub code: i32,

    /// Provider error message
    pub message: String,

    /// Optional machine label attached by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ProviderError {
    /// Create a provider error without a label.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            label: None,
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Structured, translated representation of one failed remote call.
///
/// Values are immutable once built; the `with_*` methods are construction
/// helpers used by exception factories.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct TwitterException {
    status_code: i32,
    message: String,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    http_method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    twitter_description: Option<String>,
    #[serde(default)]
    provider_errors: Vec<ProviderError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transport_error: Option<String>,
    creation_date: DateTime<Utc>,
}

impl TwitterException {
    /// Create a new exception stamped with the current time.
    #[must_use]
    pub fn new(status_code: i32, message: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            url: url.into(),
            http_method: None,
            twitter_description: None,
            provider_errors: Vec::new(),
            transport_error: None,
            creation_date: Utc::now(),
        }
    }

    /// Set the HTTP method of the failed request.
    #[must_use]
    pub const fn with_http_method(mut self, method: HttpMethod) -> Self {
        self.http_method = Some(method);
        self
    }

    /// Attach provider errors; the description is derived from their messages.
    #[must_use]
    pub fn with_provider_errors(mut self, errors: Vec<ProviderError>) -> Self {
        self.twitter_description = if errors.is_empty() {
            None
        } else {
            Some(
                errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" - "),
            )
        };
        self.provider_errors = errors;
        self
    }

    /// Attach the raw transport error description.
    #[must_use]
    pub fn with_transport_error(mut self, description: impl Into<String>) -> Self {
        self.transport_error = Some(description.into());
        self
    }

    /// Override the creation timestamp.
    #[must_use]
    pub const fn with_creation_date(mut self, creation_date: DateTime<Utc>) -> Self {
        self.creation_date = creation_date;
        self
    }

    /// HTTP status or provider code, [`UNKNOWN_STATUS_CODE`] when unresolved.
    #[must_use]
    pub const fn status_code(&self) -> i32 {
        self.status_code
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// URL of the failed request.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method of the failed request, when known.
    #[must_use]
    pub const fn http_method(&self) -> Option<HttpMethod> {
        self.http_method
    }

    /// Provider messages joined into one description.
    #[must_use]
    pub fn twitter_description(&self) -> Option<&str> {
        self.twitter_description.as_deref()
    }

    /// Provider error pairs in payload order.
    #[must_use]
    pub fn provider_errors(&self) -> &[ProviderError] {
        &self.provider_errors
    }

    /// Raw transport error description.
    #[must_use]
    pub fn transport_error(&self) -> Option<&str> {
        self.transport_error.as_deref()
    }

    /// When this exception was translated.
    #[must_use]
    pub const fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    #[must_use]
    pub const fn is_status_known(&self) -> bool {
        self.status_code != UNKNOWN_STATUS_CODE
    }

    #[must_use]
    pub fn has_provider_errors(&self) -> bool {
        !self.provider_errors.is_empty()
    }

    #[must_use]
    pub fn has_provider_error_code(&self, code: i32) -> bool {
        self.provider_errors.iter().any(|e| e.code == code)
    }

    /// Check if the platform rejected the call for exceeding its rate limit.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 429 || self.has_provider_error_code(RATE_LIMIT_EXCEEDED_CODE)
    }

    /// Check if the platform rejected the credentials.
    #[must_use]
    pub fn is_authentication_failure(&self) -> bool {
        self.status_code == 401
            || AUTHENTICATION_CODES
                .iter()
                .any(|code| self.has_provider_error_code(*code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_exception_has_no_provider_details() {
        let exception = TwitterException::new(404, "not found", "https://api.twitter.com/x");

        assert_eq!(exception.status_code(), 404);
        assert_eq!(exception.message(), "not found");
        assert_eq!(exception.url(), "https://api.twitter.com/x");
        assert!(exception.http_method().is_none());
        assert!(exception.twitter_description().is_none());
        assert!(!exception.has_provider_errors());
        assert!(exception.is_status_known());
    }

    #[test]
    fn test_provider_errors_build_description() {
        let exception = TwitterException::new(403, "forbidden", "u").with_provider_errors(vec![
            ProviderError::new(187, "Status is a duplicate."),
            ProviderError::new(326, "Account locked."),
        ]);

        assert_eq!(
            exception.twitter_description(),
            Some("Status is a duplicate. - Account locked.")
        );
        assert!(exception.has_provider_error_code(326));
        assert!(!exception.has_provider_error_code(88));
    }

    #[test]
    fn test_empty_provider_errors_clear_description() {
        let exception = TwitterException::new(500, "boom", "u").with_provider_errors(Vec::new());

        assert!(exception.twitter_description().is_none());
    }

    #[test]
    fn test_unknown_status_sentinel() {
        let exception = TwitterException::new(UNKNOWN_STATUS_CODE, "timeout", "u");

        assert!(!exception.is_status_known());
    }

    #[test]
    fn test_rate_limit_detection() {
        assert!(TwitterException::new(429, "slow down", "u").is_rate_limited());

        let by_code = TwitterException::new(400, "bad", "u")
            .with_provider_errors(vec![ProviderError::new(88, "Rate limit exceeded")]);
        assert!(by_code.is_rate_limited());

        assert!(!TwitterException::new(400, "bad", "u").is_rate_limited());
    }

    #[test]
    fn test_authentication_failure_detection() {
        assert!(TwitterException::new(401, "unauthorized", "u").is_authentication_failure());

        let by_code = TwitterException::new(400, "bad", "u")
            .with_provider_errors(vec![ProviderError::new(89, "Invalid or expired token.")]);
        assert!(by_code.is_authentication_failure());
    }

    #[test]
    fn test_display_uses_message() {
        let exception = TwitterException::new(500, "GET u failed", "u");

        assert_eq!(format!("{exception}"), "GET u failed");
    }

    #[test]
    fn test_serde_keeps_provider_errors() {
        let exception = TwitterException::new(403, "forbidden", "u")
            .with_http_method(HttpMethod::Post)
            .with_provider_errors(vec![ProviderError::new(261, "Read-only app").with_label("ro")]);

        let json = serde_json::to_value(&exception).unwrap();
        assert_eq!(json["status_code"], 403);
        assert_eq!(json["http_method"], "POST");
        assert_eq!(json["provider_errors"][0]["label"], "ro");

        let parsed: TwitterException = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, exception);
    }
}
