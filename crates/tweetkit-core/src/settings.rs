//! Policy configuration for an exception handler.

use serde::{Deserialize, Serialize};

/// Swallow and log policy of an [`crate::ExceptionHandler`].
///
/// The two flags are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionSettings {
    /// Return an absent result instead of raising translated failures
    #[serde(default = "default_true")]
    pub swallow_web_exceptions: bool,

    /// Record translated failures in the history and notify subscribers
    #[serde(default = "default_true")]
    pub log_exceptions: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ExceptionSettings {
    fn default() -> Self {
        Self {
            swallow_web_exceptions: true,
            log_exceptions: true,
        }
    }
}

impl ExceptionSettings {
    /// Set the swallow policy.
    #[must_use]
    pub const fn with_swallow_web_exceptions(mut self, enabled: bool) -> Self {
        self.swallow_web_exceptions = enabled;
        self
    }

    /// Set the log policy.
    #[must_use]
    pub const fn with_log_exceptions(mut self, enabled: bool) -> Self {
        self.log_exceptions = enabled;
        self
    }
}
