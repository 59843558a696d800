//! Test fixtures for tweetkit types.

use tweetkit_core::{ProviderError, TwitterException, TwitterQuery, WebFailure, WebRequestResult};

/// Base URL used by fixture queries.
pub const API_BASE: &str = "https://api.twitter.com";

// ─────────────────────────────────────────────────────────────────────────────
// Query Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// GET query for the authenticated user.
#[must_use]
pub fn verify_credentials_query() -> TwitterQuery {
    TwitterQuery::get(format!("{API_BASE}/1.1/account/verify_credentials.json"))
}

/// POST query blocking a user.
#[must_use]
pub fn block_query(user_id: u64) -> TwitterQuery {
    TwitterQuery::post(format!("{API_BASE}/1.1/blocks/create.json?user_id={user_id}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Exception Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// A translated exception with the given status.
#[must_use]
pub fn exception(status_code: i32) -> TwitterException {
    TwitterException::new(
        status_code,
        format!("fixture failure {status_code}"),
        format!("{API_BASE}/1.1/fixture.json"),
    )
}

/// `count` exceptions with statuses `base, base + 1, ...`.
#[must_use]
pub fn exceptions(base: i32, count: usize) -> Vec<TwitterException> {
    (base..).take(count).map(exception).collect()
}

/// Provider errors as returned for a rate-limited, then suspended, caller.
#[must_use]
pub fn provider_errors() -> Vec<ProviderError> {
    vec![
        ProviderError::new(88, "Rate limit exceeded"),
        ProviderError::new(64, "Your account is suspended and is not permitted to access this feature"),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw Failure Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Transport timeout with no status.
#[must_use]
pub fn timeout() -> WebFailure {
    WebFailure::timeout("operation timed out")
}

/// Completed exchange carrying a v1.1 error payload.
#[must_use]
pub fn failed_result(status_code: u16, code: i32, message: &str) -> WebRequestResult {
    WebRequestResult::new(
        format!("{API_BASE}/1.1/fixture.json"),
        status_code,
    )
    .with_header("content-type", "application/json")
    .with_body(json::v1_error(code, message).to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON Fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// Error payloads in the platform's formats.
pub mod json {
    use serde_json::json;

    /// v1.1 payload with a single error.
    #[must_use]
    pub fn v1_error(code: i32, message: &str) -> serde_json::Value {
        json!({
            "errors": [
                {"code": code, "message": message}
            ]
        })
    }

    /// v2 problem payload.
    #[must_use]
    pub fn v2_problem(status: u16, title: &str, detail: &str) -> serde_json::Value {
        json!({
            "title": title,
            "detail": detail,
            "type": "about:blank",
            "status": status
        })
    }

    /// Rate limit error payload.
    #[must_use]
    pub fn rate_limited() -> serde_json::Value {
        v1_error(88, "Rate limit exceeded")
    }

    /// Authentication error payload.
    #[must_use]
    pub fn auth_error() -> serde_json::Value {
        v1_error(89, "Invalid or expired token.")
    }

    /// Authenticated user object.
    #[must_use]
    pub fn user(id: u64, screen_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "id_str": id.to_string(),
            "name": screen_name,
            "screen_name": screen_name,
            "protected": false,
            "followers_count": 42,
            "friends_count": 7
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceptions_are_sequential() {
        let statuses: Vec<i32> = exceptions(400, 3).iter().map(TwitterException::status_code).collect();

        assert_eq!(statuses, vec![400, 401, 402]);
    }

    #[test]
    fn test_failed_result_carries_payload() {
        let result = failed_result(403, 261, "Application cannot perform write actions.");

        assert_eq!(result.status_code, 403);
        assert!(result.content().contains("261"));
    }
}
