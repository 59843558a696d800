//! Listener that records handler notifications.

use std::sync::Arc;

use parking_lot::Mutex;
use tweetkit_core::{ExceptionHandler, HandlerId, ListenerId, WebExceptionReceived};

/// Captures every notification it receives, in delivery order.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<WebExceptionReceived>>>,
}

impl RecordingListener {
    /// Create an unattached listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a listener and subscribe it to `handler`.
    #[must_use]
    pub fn attach(handler: &ExceptionHandler) -> Self {
        let listener = Self::new();
        listener.subscribe_to(handler);
        listener
    }

    /// Subscribe this listener to another handler.
    pub fn subscribe_to(&self, handler: &ExceptionHandler) -> ListenerId {
        let events = Arc::clone(&self.events);
        handler.subscribe(move |event: &WebExceptionReceived| events.lock().push(event.clone()))
    }

    /// All captured events.
    #[must_use]
    pub fn events(&self) -> Vec<WebExceptionReceived> {
        self.events.lock().clone()
    }

    /// Status codes of the captured exceptions.
    #[must_use]
    pub fn statuses(&self) -> Vec<i32> {
        self.events
            .lock()
            .iter()
            .map(|e| e.exception.status_code())
            .collect()
    }

    /// Senders of the captured events.
    #[must_use]
    pub fn senders(&self) -> Vec<HandlerId> {
        self.events.lock().iter().map(|e| e.sender).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
