//! Delegation from the exception handler to its translation collaborator.

use std::sync::Arc;

use tweetkit_core::{
    ExceptionHandler, HttpMethod, ProviderError, UNKNOWN_STATUS_CODE, WebRequestResult,
};
use tweetkit_testkit::{CountingFactory, fixtures};

#[test]
fn translate_dispatches_on_failure_shape() {
    let factory = CountingFactory::new();
    let handler = ExceptionHandler::new(factory.clone());
    let query = fixtures::verify_credentials_query();

    handler.translate(&fixtures::timeout(), &query);
    handler.translate(&WebRequestResult::new(&query.url, 401), &query);
    handler.translate(&fixtures::provider_errors(), &query);

    assert_eq!(factory.web_failure_calls(), 1);
    assert_eq!(factory.web_result_calls(), 1);
    assert_eq!(factory.provider_error_calls(), 1);
    assert_eq!(factory.status_overrides(), vec![UNKNOWN_STATUS_CODE]);
    assert!(handler.is_empty());
}

#[test]
fn translate_with_status_forwards_override() {
    let factory = CountingFactory::new();
    let handler = ExceptionHandler::new(factory.clone());

    let exception = handler.translate_with_status(
        &fixtures::timeout(),
        &fixtures::block_query(1),
        504,
    );

    assert_eq!(factory.status_overrides(), vec![504]);
    assert_eq!(exception.status_code(), 504);
    assert_eq!(exception.http_method(), Some(HttpMethod::Post));
}

#[test]
fn provider_payload_at_url_has_no_method() {
    let handler = ExceptionHandler::new(CountingFactory::new());
    let errors = vec![ProviderError::new(324, "The validation of media ids failed.")];

    let exception = handler.record_provider_errors_if_enabled(&errors, "https://upload.twitter.com/1.1/media/upload.json");

    assert_eq!(exception.status_code(), 324);
    assert!(exception.http_method().is_none());
    assert_eq!(handler.last_entry(), Some(exception));
}

#[test]
fn record_translates_exactly_once() {
    let factory = CountingFactory::new();
    let handler = ExceptionHandler::new(factory.clone());
    let result = fixtures::failed_result(403, 261, "Application cannot perform write actions.");

    let exception = handler.record(&result, &fixtures::block_query(9));

    assert_eq!(factory.total_calls(), 1);
    assert!(exception.has_provider_error_code(261));
    assert_eq!(handler.history(), vec![exception]);
}

#[test]
fn clones_share_the_factory() {
    let factory = CountingFactory::new();
    let handler = ExceptionHandler::new(factory.clone());
    let clone = handler.clone_settings();

    clone.translate(&fixtures::timeout(), &fixtures::verify_credentials_query());
    handler.translate(&fixtures::timeout(), &fixtures::verify_credentials_query());

    assert_eq!(factory.web_failure_calls(), 2);
    assert_eq!(Arc::strong_count(&factory), 3);
}
