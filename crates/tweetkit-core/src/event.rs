//! Notification surface of the exception handler.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::exception::TwitterException;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an exception handler, used as event sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

/// Registration handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Event raised once a translated failure has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct WebExceptionReceived {
    /// Handler that recorded the exception
    pub sender: HandlerId,

    /// The recorded exception
    pub exception: TwitterException,
}

/// Subscriber callback.
pub type WebExceptionListener = Arc<dyn Fn(&WebExceptionReceived) + Send + Sync>;

/// Ordered set of subscribers.
///
/// Cloning the registry copies the registrations; the callbacks themselves
/// are shared.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: RwLock<Vec<(ListenerId, WebExceptionListener)>>,
}

impl ListenerRegistry {
    pub(crate) fn add(&self, listener: WebExceptionListener) -> ListenerId {
        let id = ListenerId::next();
        self.entries.write().push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    /// Append every registration of `other`, keeping their ids.
    pub(crate) fn extend_from(&self, other: &Self) {
        let incoming = other.entries.read().clone();
        self.entries.write().extend(incoming);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Invoke every listener in registration order.
    ///
    /// The registry lock is not held while callbacks run.
    pub(crate) fn dispatch(&self, event: &WebExceptionReceived) {
        let listeners: Vec<WebExceptionListener> = self
            .entries
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl Clone for ListenerRegistry {
    fn clone(&self) -> Self {
        Self {
            entries: RwLock::new(self.entries.read().clone()),
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn event(status: i32) -> WebExceptionReceived {
        WebExceptionReceived {
            sender: HandlerId::next(),
            exception: TwitterException::new(status, "boom", "u"),
        }
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(HandlerId::next(), HandlerId::next());
        assert_ne!(ListenerId::next(), ListenerId::next());
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            registry.add(Arc::new(move |_: &WebExceptionReceived| seen.lock().push(tag)));
        }
        registry.dispatch(&event(500));

        assert_eq!(*seen.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove_listener() {
        let registry = ListenerRegistry::default();
        let id = registry.add(Arc::new(|_: &WebExceptionReceived| {}));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_clone_copies_registrations_only() {
        let registry = ListenerRegistry::default();
        registry.add(Arc::new(|_: &WebExceptionReceived| {}));

        let cloned = registry.clone();
        cloned.add(Arc::new(|_: &WebExceptionReceived| {}));

        assert_eq!(registry.len(), 1);
        assert_eq!(cloned.len(), 2);
    }

    #[test]
    fn test_listener_may_subscribe_during_dispatch() {
        let registry = Arc::new(ListenerRegistry::default());
        let inner = Arc::clone(&registry);
        registry.add(Arc::new(move |_: &WebExceptionReceived| {
            inner.add(Arc::new(|_: &WebExceptionReceived| {}));
        }));

        registry.dispatch(&event(404));

        assert_eq!(registry.len(), 2);
    }
}
