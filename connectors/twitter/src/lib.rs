//! tweetkit Twitter accessor
//!
//! HTTP access to the Twitter v1.1 API with every failure routed through a
//! [`tweetkit_core::ExceptionHandler`].
//!
//! ## Executors
//!
//! - [`AccountQueryExecutor`] - authenticated user, blocks, mutes, friendships, spam reports
//! - [`ListsQueryExecutor`] - list lookup
//! - [`UploadQueryExecutor`] - media processing status
//!
//! ```rust,ignore
//! let accessor = Arc::new(TwitterAccessor::new(TwitterConfig::default())?);
//! let account = AccountQueryExecutor::new(accessor.clone());
//!
//! if account.get_authenticated_user().await?.is_none() {
//!     let failure = accessor.handler().last_entry();
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod accessor;
mod account;
mod config;
mod error;
mod lists;
mod types;
mod upload;

pub use accessor::TwitterAccessor;
pub use account::AccountQueryExecutor;
pub use config::TwitterConfig;
pub use error::{TwitterError, TwitterResult};
pub use lists::{ListIdentifier, ListsQueryExecutor};
pub use types::{
    Connection, IdsCursorResult, PrivacyMode, ProcessingState, RelationshipDetailsDto,
    RelationshipEndDto, RelationshipStateDto, RelationshipUpdate, TwitterListDto,
    UploadProcessingError, UploadProcessingInfo, UploadStatus, UserDto, UserIdentifier,
    UsersCursorResult,
};
pub use upload::UploadQueryExecutor;
