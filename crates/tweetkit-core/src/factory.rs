//! Translation of raw failures into [`TwitterException`] values.

use serde_json::Value;

use crate::{
    exception::{ProviderError, TwitterException, UNKNOWN_STATUS_CODE},
    query::{HttpMethod, TwitterQuery},
    web::{WebFailure, WebRequestResult},
};

/// Maps raw transport and provider failures into translated exceptions.
///
/// Implementations must always produce an exception, falling back to a
/// generic entry for malformed input.
pub trait TwitterExceptionFactory: Send + Sync {
    /// Translate a transport failure. A `status_override` other than
    /// [`UNKNOWN_STATUS_CODE`] replaces the failure's own status.
    fn create_from_web_failure(
        &self,
        failure: &WebFailure,
        query: &TwitterQuery,
        status_override: i32,
    ) -> TwitterException;

    /// Translate a completed exchange that carries an error status.
    fn create_from_web_result(
        &self,
        result: &WebRequestResult,
        query: &TwitterQuery,
    ) -> TwitterException;

    /// Translate a provider error payload for a known query.
    fn create_from_provider_errors(
        &self,
        errors: &[ProviderError],
        query: &TwitterQuery,
    ) -> TwitterException;

    /// Translate a provider error payload when only the URL is known.
    fn create_from_provider_errors_at(&self, errors: &[ProviderError], url: &str)
    -> TwitterException;
}

/// Factory understanding the platform's v1.1 and v2 error payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExceptionFactory;

impl TwitterExceptionFactory for DefaultExceptionFactory {
    fn create_from_web_failure(
        &self,
        failure: &WebFailure,
        query: &TwitterQuery,
        status_override: i32,
    ) -> TwitterException {
        let status = if status_override == UNKNOWN_STATUS_CODE {
            failure.status_code.map_or(UNKNOWN_STATUS_CODE, i32::from)
        } else {
            status_override
        };
        let errors = failure
            .response_body
            .as_deref()
            .map(parse_provider_errors)
            .unwrap_or_default();
        let message = failure_message(
            Some(query.http_method),
            &query.url,
            status,
            Some(&failure.description),
            &errors,
        );

        TwitterException::new(status, message, &query.url)
            .with_http_method(query.http_method)
            .with_provider_errors(errors)
            .with_transport_error(&failure.description)
    }

    fn create_from_web_result(
        &self,
        result: &WebRequestResult,
        query: &TwitterQuery,
    ) -> TwitterException {
        let status = i32::from(result.status_code);
        let errors = parse_provider_errors(result.content());
        let message = failure_message(Some(query.http_method), &query.url, status, None, &errors);

        TwitterException::new(status, message, &query.url)
            .with_http_method(query.http_method)
            .with_provider_errors(errors)
    }

    fn create_from_provider_errors(
        &self,
        errors: &[ProviderError],
        query: &TwitterQuery,
    ) -> TwitterException {
        let message = provider_message(Some(query.http_method), &query.url, errors);

        TwitterException::new(first_code(errors), message, &query.url)
            .with_http_method(query.http_method)
            .with_provider_errors(errors.to_vec())
    }

    fn create_from_provider_errors_at(
        &self,
        errors: &[ProviderError],
        url: &str,
    ) -> TwitterException {
        let message = provider_message(None, url, errors);

        TwitterException::new(first_code(errors), message, url).with_provider_errors(errors.to_vec())
    }
}

/// Reason phrase for the statuses the platform documents.
#[must_use]
pub const fn status_reason(status: i32) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        406 => "Not Acceptable",
        410 => "Gone",
        420 => "Enhance Your Calm",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown status",
    }
}

fn first_code(errors: &[ProviderError]) -> i32 {
    errors.first().map_or(UNKNOWN_STATUS_CODE, |e| e.code)
}

fn target(method: Option<HttpMethod>, url: &str) -> String {
    match method {
        Some(method) => format!("{method} {url}"),
        None => url.to_string(),
    }
}

fn joined(errors: &[ProviderError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" - ")
}

fn failure_message(
    method: Option<HttpMethod>,
    url: &str,
    status: i32,
    transport: Option<&str>,
    errors: &[ProviderError],
) -> String {
    let mut message = if status == UNKNOWN_STATUS_CODE {
        format!(
            "{} failed: {}",
            target(method, url),
            transport.unwrap_or("unknown error")
        )
    } else {
        format!(
            "{} failed with {status} ({})",
            target(method, url),
            status_reason(status)
        )
    };

    if !errors.is_empty() {
        message.push_str(": ");
        message.push_str(&joined(errors));
    }
    message
}

fn provider_message(method: Option<HttpMethod>, url: &str, errors: &[ProviderError]) -> String {
    if errors.is_empty() {
        format!("{} returned an unspecified error", target(method, url))
    } else {
        format!("{} returned errors: {}", target(method, url), joined(errors))
    }
}

/// Extract provider errors from a response body, best effort.
///
/// Bodies that are not JSON, or JSON without a recognised error shape,
/// yield no errors.
pub(crate) fn parse_provider_errors(body: &str) -> Vec<ProviderError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };

    match value.get("errors") {
        Some(Value::Array(items)) => return items.iter().filter_map(provider_error).collect(),
        Some(Value::String(message)) => {
            return vec![ProviderError::new(UNKNOWN_STATUS_CODE, message.clone())];
        }
        _ => {}
    }

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return vec![ProviderError::new(UNKNOWN_STATUS_CODE, message)];
    }

    // v2 problem payload
    let message = value
        .get("detail")
        .or_else(|| value.get("title"))
        .and_then(Value::as_str);
    message.map_or_else(Vec::new, |message| {
        let code = value
            .get("status")
            .and_then(Value::as_i64)
            .and_then(|s| i32::try_from(s).ok())
            .unwrap_or(UNKNOWN_STATUS_CODE);
        vec![ProviderError::new(code, message)]
    })
}

fn provider_error(item: &Value) -> Option<ProviderError> {
    let message = item
        .get("message")
        .or_else(|| item.get("detail"))
        .or_else(|| item.get("title"))
        .and_then(Value::as_str)?;
    let code = item
        .get("code")
        .and_then(Value::as_i64)
        .and_then(|c| i32::try_from(c).ok())
        .unwrap_or(UNKNOWN_STATUS_CODE);
    let label = item.get("label").and_then(Value::as_str).map(str::to_string);

    Some(ProviderError {
        code,
        message: message.to_string(),
        label,
    })
}
