//! HTTP accessor shared by the query executors.
//!
//! Every failed call is translated by the accessor's [`ExceptionHandler`];
//! the handler's policy decides whether it is recorded and whether the
//! caller sees an error or an absent result.

use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use tweetkit_core::{
    DefaultExceptionFactory, ExceptionHandler, FailureKind, HttpMethod, TwitterException,
    TwitterQuery, WebFailure, WebRequestResult,
};
use tweetkit_telemetry::redact_url;
use url::Url;

use crate::{
    config::TwitterConfig,
    error::{TwitterError, TwitterResult},
};

/// Executes [`TwitterQuery`] values against the API.
#[derive(Debug)]
pub struct TwitterAccessor {
    client: Client,
    config: TwitterConfig,
    handler: Arc<ExceptionHandler>,
}

impl TwitterAccessor {
    /// Create an accessor with its own handler built from `config.exceptions`.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the HTTP client cannot be built.
    pub fn new(config: TwitterConfig) -> TwitterResult<Self> {
        let handler = ExceptionHandler::with_settings(
            Arc::new(DefaultExceptionFactory),
            config.exceptions,
        );
        Self::with_handler(config, Arc::new(handler))
    }

    /// Create an accessor sharing an existing handler.
    ///
    /// The handler's own policy wins over `config.exceptions`.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the HTTP client cannot be built.
    pub fn with_handler(config: TwitterConfig, handler: Arc<ExceptionHandler>) -> TwitterResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("tweetkit/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            handler,
        })
    }

    /// Handler translating this accessor's failures.
    #[must_use]
    pub const fn handler(&self) -> &Arc<ExceptionHandler> {
        &self.handler
    }

    /// Configuration the accessor was built from.
    #[must_use]
    pub const fn config(&self) -> &TwitterConfig {
        &self.config
    }

    /// Build a REST endpoint URL from a path such as `1.1/blocks/ids.json`.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Url`] if the configured base URL is invalid.
    pub fn api_endpoint(&self, path: &str, params: &[(&str, String)]) -> TwitterResult<Url> {
        endpoint(&self.config.api_url, path, params)
    }

    /// Build an upload endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Url`] if the configured upload URL is invalid.
    pub fn upload_endpoint(&self, path: &str, params: &[(&str, String)]) -> TwitterResult<Url> {
        endpoint(&self.config.upload_url, path, params)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Call shapes
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute `query`, returning `None` for a failure the handler swallows.
    ///
    /// A successful response with an empty body (e.g. `204 No Content`) also
    /// yields `None`; it is not a failure and is not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Exception`] when the handler does not swallow
    /// web exceptions, and [`TwitterError::Json`] when a successful body
    /// cannot be decoded.
    #[instrument(skip(self, query), fields(method = %query.http_method))]
    pub async fn execute_request<T: DeserializeOwned>(
        &self,
        query: &TwitterQuery,
    ) -> TwitterResult<Option<T>> {
        match self.send(query).await {
            Ok(body) => Ok(serde_json::from_str(json_or_null(&body))?),
            Err(exception) => self.swallow_or_raise(exception),
        }
    }

    /// Execute `query`, raising every failure regardless of the swallow policy.
    ///
    /// The log policy still decides whether the failure is recorded. An empty
    /// successful body decodes as JSON `null`, so `T = ()` accepts a `204`.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Exception`] for any failed call and
    /// [`TwitterError::Json`] when a successful body cannot be decoded.
    #[instrument(skip(self, query), fields(method = %query.http_method))]
    pub async fn execute_request_or_raise<T: DeserializeOwned>(
        &self,
        query: &TwitterQuery,
    ) -> TwitterResult<T> {
        let body = self.send(query).await?;
        Ok(serde_json::from_str(json_or_null(&body))?)
    }

    /// Apply the swallow policy to an already recorded exception.
    ///
    /// # Errors
    ///
    /// Returns the exception as [`TwitterError::Exception`] unless the
    /// handler swallows web exceptions.
    pub fn swallow_or_raise<T>(&self, exception: TwitterException) -> TwitterResult<Option<T>> {
        if self.handler.swallow_web_exceptions() {
            debug!(status_code = exception.status_code(), "Swallowed Twitter exception");
            Ok(None)
        } else {
            Err(TwitterError::Exception(exception))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────────

    /// Send `query` and return the body of a successful response.
    ///
    /// Failures come back translated, and recorded when the log policy is on.
    async fn send(&self, query: &TwitterQuery) -> Result<String, TwitterException> {
        let redacted = redact_url(&query.url, &self.config.redact_fields);
        debug!(method = %query.http_method, url = %redacted, "Sending Twitter request");

        let mut request = self.client.request(to_method(query.http_method), &query.url);
        if let Some(timeout) = query.timeout {
            request = request.timeout(timeout);
        }
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                warn!(url = %redacted, error = %e, "Twitter request failed before a response");
                return Err(self.handler.record_if_enabled(&web_failure(&e), query));
            }
        };

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(|e| {
                let e = e.without_url();
                warn!(url = %redacted, error = %e, "Failed to read Twitter response body");
                self.handler
                    .record_if_enabled(&web_failure(&e).with_status(status.as_u16()), query)
            });
        }

        let result = web_result(query, response).await;
        warn!(
            url = %redacted,
            status_code = result.status_code,
            "Twitter request returned an error status"
        );
        Err(self.handler.record_if_enabled(&result, query))
    }
}

fn json_or_null(body: &str) -> &str {
    if body.trim().is_empty() { "null" } else { body }
}

fn endpoint(base: &str, path: &str, params: &[(&str, String)]) -> TwitterResult<Url> {
    let mut url = Url::parse(&format!("{}/", base.trim_end_matches('/')))?.join(path)?;
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn web_failure(error: &reqwest::Error) -> WebFailure {
    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connect
    } else if error.is_body() {
        FailureKind::Body
    } else if error.is_decode() {
        FailureKind::Decode
    } else if error.is_status() {
        FailureKind::Status
    } else {
        FailureKind::Request
    };

    let failure = WebFailure::new(kind, error.to_string());
    match error.status() {
        Some(status) => failure.with_status(status.as_u16()),
        None => failure,
    }
}

async fn web_result(query: &TwitterQuery, response: Response) -> WebRequestResult {
    let mut result = WebRequestResult::new(&query.url, response.status().as_u16());
    for (name, value) in response.headers() {
        if let Ok(value) = value.to_str() {
            result = result.with_header(name.as_str(), value);
        }
    }

    match response.text().await {
        Ok(body) if !body.is_empty() => result.with_body(body),
        _ => result,
    }
}
