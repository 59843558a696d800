//! Errors raised by the exception handler itself.
//!
//! Upstream HTTP and provider failures are never represented here; they are
//! translated into [`crate::TwitterException`] values instead.

use thiserror::Error;

/// Structural errors of the exception handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A required argument was absent.
    #[error("Invalid argument: {name} must be provided")]
    InvalidArgument {
        /// Name of the missing argument
        name: &'static str,
    },
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
