//! Factory wrapper for asserting delegation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tweetkit_core::{
    DefaultExceptionFactory, ProviderError, TwitterException, TwitterExceptionFactory,
    TwitterQuery, WebFailure, WebRequestResult,
};

/// Delegates to an inner factory and counts calls per entry point.
pub struct CountingFactory {
    inner: Arc<dyn TwitterExceptionFactory>,
    web_failures: AtomicUsize,
    web_results: AtomicUsize,
    provider_errors: AtomicUsize,
    status_overrides: Mutex<Vec<i32>>,
}

impl CountingFactory {
    /// Wrap the default factory.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Self::wrap(Arc::new(DefaultExceptionFactory))
    }

    /// Wrap an arbitrary factory.
    #[must_use]
    pub fn wrap(inner: Arc<dyn TwitterExceptionFactory>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            web_failures: AtomicUsize::new(0),
            web_results: AtomicUsize::new(0),
            provider_errors: AtomicUsize::new(0),
            status_overrides: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn web_failure_calls(&self) -> usize {
        self.web_failures.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn web_result_calls(&self) -> usize {
        self.web_results.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn provider_error_calls(&self) -> usize {
        self.provider_errors.load(Ordering::SeqCst)
    }

    /// Status overrides passed to `create_from_web_failure`, in call order.
    #[must_use]
    pub fn status_overrides(&self) -> Vec<i32> {
        self.status_overrides.lock().clone()
    }

    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.web_failure_calls() + self.web_result_calls() + self.provider_error_calls()
    }
}

impl TwitterExceptionFactory for CountingFactory {
    fn create_from_web_failure(
        &self,
        failure: &WebFailure,
        query: &TwitterQuery,
        status_override: i32,
    ) -> TwitterException {
        self.web_failures.fetch_add(1, Ordering::SeqCst);
        self.status_overrides.lock().push(status_override);
        self.inner
            .create_from_web_failure(failure, query, status_override)
    }

    fn create_from_web_result(
        &self,
        result: &WebRequestResult,
        query: &TwitterQuery,
    ) -> TwitterException {
        self.web_results.fetch_add(1, Ordering::SeqCst);
        self.inner.create_from_web_result(result, query)
    }

    fn create_from_provider_errors(
        &self,
        errors: &[ProviderError],
        query: &TwitterQuery,
    ) -> TwitterException {
        self.provider_errors.fetch_add(1, Ordering::SeqCst);
        self.inner.create_from_provider_errors(errors, query)
    }

    fn create_from_provider_errors_at(
        &self,
        errors: &[ProviderError],
        url: &str,
    ) -> TwitterException {
        self.provider_errors.fetch_add(1, Ordering::SeqCst);
        self.inner.create_from_provider_errors_at(errors, url)
    }
}
