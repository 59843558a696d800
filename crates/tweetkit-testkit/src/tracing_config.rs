//! Tracing configuration for test output.

use std::io;
use std::sync::{Arc, Once};

use parking_lot::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static INIT: Once = Once::new();

/// Initialize tracing for tests.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Uses `RUST_LOG` if set, otherwise `info,tweetkit_core=debug`.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,tweetkit_core=debug"));

        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_ansi(true)
                    .compact(),
            )
            .try_init();
    });
}

/// Captures formatted log output of the tweetkit crates on the current
/// thread, at every level.
///
/// Use with `#[tokio::test]` (current-thread runtime) or plain `#[test]`;
/// events emitted on other threads are not captured.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route this thread's tweetkit events into the capture until the guard drops.
    #[must_use]
    pub fn set_default(&self) -> DefaultGuard {
        let buffer = Arc::clone(&self.buffer);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(move || CaptureWriter(Arc::clone(&buffer)))
            .with_filter(filter_fn(|meta| meta.target().starts_with("tweetkit")));
        tracing::subscriber::set_default(tracing_subscriber::registry().with(layer))
    }

    /// Everything captured so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_capture_records_events() {
        let capture = LogCapture::new();
        {
            let _guard = capture.set_default();
            tracing::warn!(user = "jack", "captured line");
        }
        tracing::warn!("after the guard");

        assert!(capture.contains("captured line"));
        assert!(capture.contains("user=\"jack\""));
        assert!(!capture.contains("after the guard"));
    }
}
