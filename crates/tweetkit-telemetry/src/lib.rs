//! tweetkit telemetry - structured logging for applications using the SDK.
//!
//! The SDK crates only emit `tracing` events; applications opt into output
//! by initialising a subscriber here.
//!
//! ```rust,ignore
//! use tweetkit_telemetry::{TelemetryConfig, init_telemetry};
//!
//! init_telemetry(TelemetryConfig::new("my-app").with_json_logs(false))?;
//! tracing::info!("Starting up");
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod logging;

pub use logging::*;

/// Configuration for telemetry initialization.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name reported when telemetry starts.
    pub service_name: String,

    /// Log level filter (e.g., "info", "debug", "trace").
    pub log_level: String,

    /// Enable JSON log output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tweetkit".to_string(),
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl TelemetryConfig {
    /// Create a new configuration with the given service name.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable or disable JSON logs.
    #[must_use]
    pub const fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

/// Default names to mask with [`redact_sensitive`] and [`redact_url`].
#[must_use]
pub fn default_redact_fields() -> Vec<String> {
    ["password", "secret", "token", "authorization", "oauth_signature"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Initialize logging.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] if a global subscriber is already
/// installed and [`TelemetryError::InvalidFilter`] for an unparsable level.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(&config)?;
    tracing::info!(service = %config.service_name, "Telemetry initialised");
    Ok(())
}

/// Telemetry error type.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Log level directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();

        assert_eq!(config.service_name, "tweetkit");
        assert_eq!(config.log_level, "info");
        assert!(config.json_logs);
    }

    #[test]
    fn test_telemetry_config_builder_chain() {
        let config = TelemetryConfig::new("my-app")
            .with_log_level("trace")
            .with_json_logs(false);

        assert_eq!(config.service_name, "my-app");
        assert_eq!(config.log_level, "trace");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_default_redact_fields() {
        let fields = default_redact_fields();

        assert!(fields.contains(&"token".to_string()));
        assert!(fields.contains(&"oauth_signature".to_string()));
    }

    #[test]
    fn test_init_telemetry_only_once() {
        let config = TelemetryConfig::new("test").with_json_logs(false);

        // Whether or not the first call wins, a global subscriber is set after it.
        let _ = init_telemetry(config.clone());
        let second = init_telemetry(config);

        assert!(matches!(second, Err(TelemetryError::LoggingInit(_))));
    }

    #[test]
    fn test_telemetry_error_logging_init() {
        let error = TelemetryError::LoggingInit("already set".to_string());
        let error_str = format!("{error}");

        assert!(error_str.contains("Failed to initialize logging"));
        assert!(error_str.contains("already set"));
    }
}
