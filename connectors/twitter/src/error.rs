//! Twitter accessor error types.

use thiserror::Error;
use tweetkit_core::{HandlerError, TwitterException};

/// Errors raised by the accessor and the query executors.
#[derive(Error, Debug)]
pub enum TwitterError {
    /// HTTP client could not be built or used
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Remote call failed and the handler raised its translation
    #[error("Twitter exception: {0}")]
    Exception(#[from] TwitterException),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exception handler rejected an argument
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl TwitterError {
    /// Check if this error is worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Exception(e) => {
                let status = e.status_code();
                e.is_rate_limited() || status >= 500 || !e.is_status_known()
            }
            _ => false,
        }
    }

    /// The translated exception, if this error carries one.
    #[must_use]
    pub const fn exception(&self) -> Option<&TwitterException> {
        match self {
            Self::Exception(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for Twitter operations.
pub type TwitterResult<T> = Result<T, TwitterError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn exception(status: i32) -> TwitterException {
        TwitterException::new(status, "failed", "https://api.twitter.com/1.1/x.json")
    }

    #[test]
    fn test_exception_retryable_by_status() {
        assert!(TwitterError::Exception(exception(503)).is_retryable());
        assert!(TwitterError::Exception(exception(429)).is_retryable());
        assert!(TwitterError::Exception(exception(-1)).is_retryable());
        assert!(!TwitterError::Exception(exception(404)).is_retryable());
        assert!(!TwitterError::Exception(exception(401)).is_retryable());
    }

    #[test]
    fn test_config_not_retryable() {
        let error = TwitterError::Config("missing".into());

        assert!(!error.is_retryable());
        assert!(error.exception().is_none());
        assert_eq!(error.to_string(), "Configuration error: missing");
    }

    #[test]
    fn test_exception_accessor() {
        let error = TwitterError::from(exception(404));

        assert_eq!(error.exception().map(TwitterException::status_code), Some(404));
    }

    #[test]
    fn test_handler_error_is_transparent() {
        let error = TwitterError::from(HandlerError::InvalidArgument { name: "other" });

        assert_eq!(
            error.to_string(),
            HandlerError::InvalidArgument { name: "other" }.to_string()
        );
    }
}
