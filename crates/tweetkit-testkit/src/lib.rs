//! tweetkit test kit - shared testing utilities for the tweetkit crates.
//!
//! - [`RecordingListener`] - captures handler notifications in delivery order
//! - [`CountingFactory`] - wraps a factory and counts delegated calls
//! - [`MockApiServer`] - wiremock-backed stand-in for the Twitter API
//! - [`fixtures`] - queries, exceptions and error payloads
//! - [`LogCapture`] - thread-local log capture for asserting on log lines
//! - Tracing configuration for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use tweetkit_testkit::{RecordingListener, fixtures};
//!
//! let handler = tweetkit_core::ExceptionHandler::default();
//! let listener = RecordingListener::attach(&handler);
//!
//! handler.append(fixtures::exception(404));
//! assert_eq!(listener.statuses(), vec![404]);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod factory;
pub mod fixtures;
mod listener;
mod mock_server;
mod tracing_config;

pub use factory::*;
pub use listener::*;
pub use mock_server::*;
pub use tracing_config::*;

// Re-export core types for convenience
pub use tweetkit_core::{ExceptionHandler, TwitterException, TwitterQuery, WebExceptionReceived};
