//! Thread-safe translation, history and notification of Twitter failures.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    error::{HandlerError, HandlerResult},
    event::{HandlerId, ListenerId, ListenerRegistry, WebExceptionReceived},
    exception::{ProviderError, TwitterException, UNKNOWN_STATUS_CODE},
    factory::{DefaultExceptionFactory, TwitterExceptionFactory},
    query::TwitterQuery,
    settings::ExceptionSettings,
    web::{Failure, WebFailure},
};

/// Translates raw failures and keeps an ordered, append-only history of them.
///
/// Every handler owns its own history lock. Notifications are delivered
/// synchronously after the entry is in the history and outside the lock, so
/// listeners may read from or record into the same handler.
///
/// Notification order matches history order for calls that do not overlap
/// in time, and within one `append_many` batch. When several threads record
/// at once, each entry is committed atomically but listeners may observe the
/// notifications in a different order than `history()` lists the entries.
///
/// The swallow policy is only stored here; query executors read it to decide
/// whether a translated exception is raised or replaced by an absent result.
pub struct ExceptionHandler {
    id: HandlerId,
    factory: Arc<dyn TwitterExceptionFactory>,
    history: Mutex<Vec<TwitterException>>,
    swallow_web_exceptions: AtomicBool,
    log_exceptions: AtomicBool,
    listeners: ListenerRegistry,
}

impl ExceptionHandler {
    /// Create a handler with default settings.
    #[must_use]
    pub fn new(factory: Arc<dyn TwitterExceptionFactory>) -> Self {
        Self::with_settings(factory, ExceptionSettings::default())
    }

    /// Create a handler with explicit settings.
    #[must_use]
    pub fn with_settings(
        factory: Arc<dyn TwitterExceptionFactory>,
        settings: ExceptionSettings,
    ) -> Self {
        Self {
            id: HandlerId::next(),
            factory,
            history: Mutex::new(Vec::new()),
            swallow_web_exceptions: AtomicBool::new(settings.swallow_web_exceptions),
            log_exceptions: AtomicBool::new(settings.log_exceptions),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Identity used as the sender of this handler's events.
    #[must_use]
    pub const fn id(&self) -> HandlerId {
        self.id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Policy
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn swallow_web_exceptions(&self) -> bool {
        self.swallow_web_exceptions.load(Ordering::Acquire)
    }

    pub fn set_swallow_web_exceptions(&self, enabled: bool) {
        self.swallow_web_exceptions.store(enabled, Ordering::Release);
    }

    #[must_use]
    pub fn log_exceptions(&self) -> bool {
        self.log_exceptions.load(Ordering::Acquire)
    }

    pub fn set_log_exceptions(&self, enabled: bool) {
        self.log_exceptions.store(enabled, Ordering::Release);
    }

    /// Snapshot of both policy flags.
    #[must_use]
    pub fn settings(&self) -> ExceptionSettings {
        ExceptionSettings {
            swallow_web_exceptions: self.swallow_web_exceptions(),
            log_exceptions: self.log_exceptions(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Translation
    // ─────────────────────────────────────────────────────────────────────────

    /// Translate a raw failure without recording or notifying.
    pub fn translate<'a>(
        &self,
        failure: impl Into<Failure<'a>>,
        query: &TwitterQuery,
    ) -> TwitterException {
        match failure.into() {
            Failure::Transport(failure) => {
                self.factory
                    .create_from_web_failure(failure, query, UNKNOWN_STATUS_CODE)
            }
            Failure::Response(result) => self.factory.create_from_web_result(result, query),
            Failure::Provider(errors) => self.factory.create_from_provider_errors(errors, query),
        }
    }

    /// Translate a transport failure, forcing the status code.
    pub fn translate_with_status(
        &self,
        failure: &WebFailure,
        query: &TwitterQuery,
        status_code: i32,
    ) -> TwitterException {
        self.factory
            .create_from_web_failure(failure, query, status_code)
    }

    /// Translate a provider error payload when only the URL is known.
    pub fn translate_provider_errors_at(
        &self,
        errors: &[ProviderError],
        url: &str,
    ) -> TwitterException {
        self.factory.create_from_provider_errors_at(errors, url)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recording
    // ─────────────────────────────────────────────────────────────────────────

    /// Translate and record regardless of the log policy.
    pub fn record<'a>(
        &self,
        failure: impl Into<Failure<'a>>,
        query: &TwitterQuery,
    ) -> TwitterException {
        let exception = self.translate(failure, query);
        self.append(exception.clone());
        exception
    }

    /// Translate, and record only when the log policy is enabled.
    ///
    /// The translated exception is returned either way.
    pub fn record_if_enabled<'a>(
        &self,
        failure: impl Into<Failure<'a>>,
        query: &TwitterQuery,
    ) -> TwitterException {
        let exception = self.translate(failure, query);
        if self.log_exceptions() {
            self.append(exception.clone());
        }
        exception
    }

    /// Translate a provider payload for `url`, recording it when the log
    /// policy is enabled.
    pub fn record_provider_errors_if_enabled(
        &self,
        errors: &[ProviderError],
        url: &str,
    ) -> TwitterException {
        let exception = self.translate_provider_errors_at(errors, url);
        if self.log_exceptions() {
            self.append(exception.clone());
        }
        exception
    }

    /// Record an already translated exception and notify for it.
    pub fn append(&self, exception: TwitterException) {
        self.history.lock().push(exception.clone());
        debug!(
            handler = %self.id,
            status_code = exception.status_code(),
            path = exception.url().split('?').next().unwrap_or_default(),
            "Recorded Twitter exception"
        );
        self.notify(exception);
    }

    /// Record a batch in one critical section, then notify in input order.
    pub fn append_many(&self, exceptions: impl IntoIterator<Item = TwitterException>) {
        let exceptions: Vec<TwitterException> = exceptions.into_iter().collect();
        if exceptions.is_empty() {
            return;
        }

        self.history.lock().extend(exceptions.iter().cloned());
        debug!(
            handler = %self.id,
            count = exceptions.len(),
            "Recorded Twitter exceptions"
        );

        for exception in exceptions {
            self.notify(exception);
        }
    }

    fn notify(&self, exception: TwitterException) {
        trace!(handler = %self.id, listeners = self.listeners.len(), "Dispatching web exception");
        self.listeners.dispatch(&WebExceptionReceived {
            sender: self.id,
            exception,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy of the history in commit order.
    #[must_use]
    pub fn history(&self) -> Vec<TwitterException> {
        self.history.lock().clone()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.lock().is_empty()
    }

    /// Most recently committed entry.
    #[must_use]
    pub fn last_entry(&self) -> Option<TwitterException> {
        self.history.lock().last().cloned()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a listener for recorded exceptions.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&WebExceptionReceived) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings propagation
    // ─────────────────────────────────────────────────────────────────────────

    /// New handler sharing the factory, flags and listeners, with an empty
    /// history.
    #[must_use]
    pub fn clone_settings(&self) -> Self {
        Self {
            id: HandlerId::next(),
            factory: Arc::clone(&self.factory),
            history: Mutex::new(Vec::new()),
            swallow_web_exceptions: AtomicBool::new(self.swallow_web_exceptions()),
            log_exceptions: AtomicBool::new(self.log_exceptions()),
            listeners: self.listeners.clone(),
        }
    }

    /// Copy the flags of `other` and forward this handler's future
    /// notifications to the listeners `other` has registered.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidArgument`] when `other` is `None`.
    pub fn apply_settings_from(&self, other: Option<&Self>) -> HandlerResult<()> {
        let other = other.ok_or(HandlerError::InvalidArgument { name: "other" })?;

        self.set_swallow_web_exceptions(other.swallow_web_exceptions());
        self.set_log_exceptions(other.log_exceptions());
        self.listeners.extend_from(&other.listeners);
        Ok(())
    }
}

impl Default for ExceptionHandler {
    fn default() -> Self {
        Self::new(Arc::new(DefaultExceptionFactory))
    }
}

impl fmt::Debug for ExceptionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionHandler")
            .field("id", &self.id)
            .field("history_len", &self.history_len())
            .field("swallow_web_exceptions", &self.swallow_web_exceptions())
            .field("log_exceptions", &self.log_exceptions())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::WebRequestResult;

    fn query() -> TwitterQuery {
        TwitterQuery::get("https://api.twitter.com/1.1/account/settings.json")
    }

    #[test]
    fn test_new_handler_defaults() {
        let handler = ExceptionHandler::default();

        assert!(handler.swallow_web_exceptions());
        assert!(handler.log_exceptions());
        assert!(handler.is_empty());
        assert!(handler.last_entry().is_none());
        assert_eq!(handler.listener_count(), 0);
    }

    #[test]
    fn test_translate_does_not_record() {
        let handler = ExceptionHandler::default();
        let exception = handler.translate(&WebRequestResult::new("u", 404), &query());

        assert_eq!(exception.status_code(), 404);
        assert!(handler.is_empty());
    }

    #[test]
    fn test_translate_with_status_override() {
        let handler = ExceptionHandler::default();
        let exception =
            handler.translate_with_status(&WebFailure::connect("reset"), &query(), 502);

        assert_eq!(exception.status_code(), 502);
    }

    #[test]
    fn test_record_ignores_log_policy() {
        let handler = ExceptionHandler::default();
        handler.set_log_exceptions(false);

        let exception = handler.record(&WebFailure::timeout("timed out"), &query());

        assert_eq!(handler.last_entry(), Some(exception));
    }

    #[test]
    fn test_record_if_enabled_respects_log_policy() {
        let handler = ExceptionHandler::default();
        handler.set_log_exceptions(false);

        let exception = handler.record_if_enabled(&WebRequestResult::new("u", 500), &query());

        assert_eq!(exception.status_code(), 500);
        assert_eq!(handler.history_len(), 0);
    }

    #[test]
    fn test_settings_snapshot() {
        let handler = ExceptionHandler::with_settings(
            Arc::new(DefaultExceptionFactory),
            ExceptionSettings::default().with_swallow_web_exceptions(false),
        );

        assert_eq!(
            handler.settings(),
            ExceptionSettings {
                swallow_web_exceptions: false,
                log_exceptions: true,
            }
        );
    }

    #[test]
    fn test_append_many_empty_is_noop() {
        let handler = ExceptionHandler::default();
        handler.append_many(Vec::new());

        assert!(handler.is_empty());
    }

    #[test]
    fn test_apply_settings_from_self_keeps_flags() {
        let handler = ExceptionHandler::default();
        handler.set_swallow_web_exceptions(false);

        handler.apply_settings_from(Some(&handler)).unwrap();

        assert!(!handler.swallow_web_exceptions());
    }

    #[test]
    fn test_debug_output() {
        let handler = ExceptionHandler::default();
        let debug = format!("{handler:?}");

        assert!(debug.contains("ExceptionHandler"));
        assert!(debug.contains("history_len"));
    }
}
