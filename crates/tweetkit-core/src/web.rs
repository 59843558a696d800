//! Raw outcomes handed over by the HTTP transport.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::exception::ProviderError;

/// Category of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request did not complete in time
    Timeout,
    /// The connection could not be established
    Connect,
    /// The request could not be built or sent
    Request,
    /// The response body could not be read
    Body,
    /// The response body could not be decoded
    Decode,
    /// The server answered with an error status
    Status,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
        };
        f.write_str(name)
    }
}

/// A raw network failure, before translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebFailure {
    /// Failure category
    pub kind: FailureKind,

    /// HTTP status, when the transport got that far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Transport description of the failure
    pub description: String,

    /// Response body, when one was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl WebFailure {
    /// Create a failure of the given kind.
    #[must_use]
    pub fn new(kind: FailureKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            status_code: None,
            description: description.into(),
            response_body: None,
        }
    }

    #[must_use]
    pub fn timeout(description: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, description)
    }

    #[must_use]
    pub fn connect(description: impl Into<String>) -> Self {
        Self::new(FailureKind::Connect, description)
    }

    /// Set the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Set the response body.
    #[must_use]
    pub fn with_response_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }
}

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebRequestResult {
    /// Request URL
    pub url: String,

    /// HTTP status
    pub status_code: u16,

    /// Response headers, names lower-cased
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Response body as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl WebRequestResult {
    /// Create a result without headers or body.
    #[must_use]
    pub fn new(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a response header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Check for a 2xx status.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }

    /// Response body, empty when none was received.
    #[must_use]
    pub fn content(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Any raw failure shape the handler can translate.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// Network-level failure
    Transport(&'a WebFailure),
    /// Completed exchange with an error status
    Response(&'a WebRequestResult),
    /// Provider error payload without a transport failure
    Provider(&'a [ProviderError]),
}

impl<'a> From<&'a WebFailure> for Failure<'a> {
    fn from(failure: &'a WebFailure) -> Self {
        Self::Transport(failure)
    }
}

impl<'a> From<&'a WebRequestResult> for Failure<'a> {
    fn from(result: &'a WebRequestResult) -> Self {
        Self::Response(result)
    }
}

impl<'a> From<&'a [ProviderError]> for Failure<'a> {
    fn from(errors: &'a [ProviderError]) -> Self {
        Self::Provider(errors)
    }
}

impl<'a> From<&'a Vec<ProviderError>> for Failure<'a> {
    fn from(errors: &'a Vec<ProviderError>) -> Self {
        Self::Provider(errors.as_slice())
    }
}
