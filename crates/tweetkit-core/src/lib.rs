//! tweetkit core - exception translation and history for the Twitter SDK.
//!
//! Query executors hand raw failures (transport errors, non-success
//! responses, provider error payloads) to an [`ExceptionHandler`], which
//! translates them through a [`TwitterExceptionFactory`], optionally records
//! them in an ordered history and notifies subscribers.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tweetkit_core::{DefaultExceptionFactory, ExceptionHandler, TwitterQuery, WebFailure};
//!
//! let handler = ExceptionHandler::new(Arc::new(DefaultExceptionFactory));
//! handler.subscribe(|event| tracing::warn!(status = event.exception.status_code(), "failure"));
//!
//! let query = TwitterQuery::get("https://api.twitter.com/1.1/account/verify_credentials.json");
//! let exception = handler.record_if_enabled(&WebFailure::timeout("timed out"), &query);
//! assert_eq!(handler.last_entry(), Some(exception));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod event;
mod exception;
mod factory;
mod handler;
mod query;
mod settings;
mod web;

pub use error::{HandlerError, HandlerResult};
pub use event::{HandlerId, ListenerId, WebExceptionListener, WebExceptionReceived};
pub use exception::{ProviderError, TwitterException, UNKNOWN_STATUS_CODE};
pub use factory::{DefaultExceptionFactory, TwitterExceptionFactory, status_reason};
pub use handler::ExceptionHandler;
pub use query::{HttpMethod, TwitterQuery};
pub use settings::ExceptionSettings;
pub use web::{Failure, FailureKind, WebFailure, WebRequestResult};
