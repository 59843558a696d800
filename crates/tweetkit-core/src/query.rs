//! Request context of an attempted call.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP method of a Twitter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The call that was attempted: URL, method and execution context.
///
/// The exception handler only passes this through to the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitterQuery {
    /// Fully built request URL
    pub url: String,

    /// HTTP method
    pub http_method: HttpMethod,

    /// Per-request timeout, overriding the client default
    pub timeout: Option<Duration>,
}

impl TwitterQuery {
    /// Create a query.
    #[must_use]
    pub fn new(http_method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_method,
            timeout: None,
        }
    }

    /// Create a GET query.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Create a POST query.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Create a DELETE query.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builders() {
        let query = TwitterQuery::post("https://api.twitter.com/1.1/blocks/create.json")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(query.http_method, HttpMethod::Post);
        assert_eq!(query.url, "https://api.twitter.com/1.1/blocks/create.json");
        assert_eq!(query.timeout, Some(Duration::from_secs(5)));
        assert_eq!(TwitterQuery::get("u").http_method, HttpMethod::Get);
        assert_eq!(TwitterQuery::delete("u").http_method, HttpMethod::Delete);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
