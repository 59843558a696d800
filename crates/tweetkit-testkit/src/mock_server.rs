//! Mock HTTP server standing in for the Twitter API.
//!
//! Thin wrapper around wiremock for the request shapes the query executors use.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock API server for executor tests.
pub struct MockApiServer {
    server: MockServer,
}

impl MockApiServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server for advanced configuration.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Response Setup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Respond to `GET request_path` with JSON.
    pub async fn expect_get(&self, request_path: &str, response: serde_json::Value) {
        self.respond("GET", request_path, ResponseTemplate::new(200).set_body_json(response))
            .await;
    }

    /// Respond to `POST request_path` with JSON.
    pub async fn expect_post(&self, request_path: &str, response: serde_json::Value) {
        self.respond("POST", request_path, ResponseTemplate::new(200).set_body_json(response))
            .await;
    }

    /// Respond to `GET request_path` carrying a query parameter with JSON.
    pub async fn expect_get_with_query(
        &self,
        request_path: &str,
        param_name: &str,
        param_value: &str,
        response: serde_json::Value,
    ) {
        Mock::given(method("GET"))
            .and(path(request_path))
            .and(query_param(param_name, param_value))
            .respond_with(json_response(ResponseTemplate::new(200).set_body_json(response)))
            .mount(&self.server)
            .await;
    }

    /// Respond to any request on `request_path` with an error status and JSON body.
    pub async fn expect_error(&self, request_path: &str, status: u16, error_body: serde_json::Value) {
        Mock::given(path(request_path))
            .respond_with(json_response(
                ResponseTemplate::new(status).set_body_json(error_body),
            ))
            .mount(&self.server)
            .await;
    }

    /// Respond to any request on `request_path` with an error status and a raw body.
    pub async fn expect_raw_error(&self, request_path: &str, status: u16, body: &str) {
        Mock::given(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Respond to any request on `request_path` after a delay.
    pub async fn expect_delayed(
        &self,
        request_path: &str,
        delay: Duration,
        response: serde_json::Value,
    ) {
        Mock::given(path(request_path))
            .respond_with(json_response(
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(response),
            ))
            .mount(&self.server)
            .await;
    }

    async fn respond(&self, http_method: &str, request_path: &str, template: ResponseTemplate) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(json_response(template))
            .mount(&self.server)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────────

    /// Verify the number of received requests.
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.received_requests().await;
        assert_eq!(
            received.len(),
            expected,
            "Expected {} requests but received {}",
            expected,
            received.len()
        );
    }

    /// Verify that a request with the given method reached `request_path`.
    ///
    /// # Panics
    ///
    /// Panics if no matching request was found.
    pub async fn assert_received(&self, http_method: &str, request_path: &str) {
        let received = self.received_requests().await;
        let found = received
            .iter()
            .any(|r| r.method.as_str() == http_method && r.url.path() == request_path);
        assert!(
            found,
            "No {} request received to path '{}'. Received: {:?}",
            http_method,
            request_path,
            received
                .iter()
                .map(|r| format!("{} {}", r.method, r.url))
                .collect::<Vec<_>>()
        );
    }

    /// All received requests.
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

fn json_response(template: ResponseTemplate) -> ResponseTemplate {
    template.insert_header("content-type", "application/json")
}
