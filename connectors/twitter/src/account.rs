//! Account queries: the authenticated user, blocks, mutes, friendships and
//! spam reports.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;
use tweetkit_core::TwitterQuery;

use crate::{
    accessor::TwitterAccessor,
    error::TwitterResult,
    types::{
        IdsCursorResult, RelationshipDetailsDto, RelationshipEnvelope, RelationshipStateDto,
        RelationshipUpdate, UserDto, UserIdentifier, UsersCursorResult,
    },
};

const VERIFY_CREDENTIALS: &str = "1.1/account/verify_credentials.json";
const BLOCKS_CREATE: &str = "1.1/blocks/create.json";
const BLOCKS_DESTROY: &str = "1.1/blocks/destroy.json";
const BLOCKS_IDS: &str = "1.1/blocks/ids.json";
const BLOCKS_LIST: &str = "1.1/blocks/list.json";
const REPORT_SPAM: &str = "1.1/users/report_spam.json";
const MUTES_CREATE: &str = "1.1/mutes/users/create.json";
const MUTES_DESTROY: &str = "1.1/mutes/users/destroy.json";
const MUTES_IDS: &str = "1.1/mutes/users/ids.json";
const MUTES_LIST: &str = "1.1/mutes/users/list.json";
const FRIENDSHIPS_CREATE: &str = "1.1/friendships/create.json";
const FRIENDSHIPS_DESTROY: &str = "1.1/friendships/destroy.json";
const FRIENDSHIPS_INCOMING: &str = "1.1/friendships/incoming.json";
const FRIENDSHIPS_OUTGOING: &str = "1.1/friendships/outgoing.json";
const FRIENDSHIPS_UPDATE: &str = "1.1/friendships/update.json";
const FRIENDSHIPS_LOOKUP: &str = "1.1/friendships/lookup.json";
const FRIENDSHIPS_NO_RETWEETS_IDS: &str = "1.1/friendships/no_retweets/ids.json";

/// Executes account level queries.
///
/// Every operation returns `Ok(None)` when the call failed and the handler
/// swallows web exceptions.
#[derive(Debug, Clone)]
pub struct AccountQueryExecutor {
    accessor: Arc<TwitterAccessor>,
}

impl AccountQueryExecutor {
    /// Create an executor on top of `accessor`.
    #[must_use]
    pub const fn new(accessor: Arc<TwitterAccessor>) -> Self {
        Self { accessor }
    }

    /// The user the credentials belong to.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_authenticated_user(&self) -> TwitterResult<Option<UserDto>> {
        let url = self.accessor.api_endpoint(VERIFY_CREDENTIALS, &[])?;
        self.accessor.execute_request(&TwitterQuery::get(url)).await
    }

    /// Block `user`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn block_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(BLOCKS_CREATE, user).await
    }

    /// Unblock `user`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn unblock_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(BLOCKS_DESTROY, user).await
    }

    /// Report `user` as a spammer; the account is blocked as well.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn report_user_for_spam(
        &self,
        user: &UserIdentifier,
    ) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(REPORT_SPAM, user).await
    }

    /// One page of blocked user ids, starting at `cursor`.
    ///
    /// Pass [`IdsCursorResult::FIRST_PAGE`] for the first page.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_blocked_user_ids(
        &self,
        cursor: i64,
    ) -> TwitterResult<Option<IdsCursorResult>> {
        self.get_page(BLOCKS_IDS, cursor).await
    }

    /// One page of blocked users, starting at `cursor`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_blocked_users(
        &self,
        cursor: i64,
    ) -> TwitterResult<Option<UsersCursorResult>> {
        self.get_page(BLOCKS_LIST, cursor).await
    }

    /// Mute `user`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn mute_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(MUTES_CREATE, user).await
    }

    /// Unmute `user`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn unmute_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(MUTES_DESTROY, user).await
    }

    /// One page of muted user ids, starting at `cursor`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_muted_user_ids(&self, cursor: i64) -> TwitterResult<Option<IdsCursorResult>> {
        self.get_page(MUTES_IDS, cursor).await
    }

    /// One page of muted users, starting at `cursor`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_muted_users(&self, cursor: i64) -> TwitterResult<Option<UsersCursorResult>> {
        self.get_page(MUTES_LIST, cursor).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Friendships
    // ─────────────────────────────────────────────────────────────────────────

    /// Follow `user`. For a protected account this sends a follow request.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn follow_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(FRIENDSHIPS_CREATE, user).await
    }

    /// Stop following `user`.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn unfollow_user(&self, user: &UserIdentifier) -> TwitterResult<Option<UserDto>> {
        self.post_for_user(FRIENDSHIPS_DESTROY, user).await
    }

    /// One page of ids of users with a pending follow request to the
    /// authenticated user.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_user_ids_requesting_friendship(
        &self,
        cursor: i64,
    ) -> TwitterResult<Option<IdsCursorResult>> {
        self.get_page(FRIENDSHIPS_INCOMING, cursor).await
    }

    /// One page of ids of protected users the authenticated user asked to
    /// follow.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_user_ids_you_requested_to_follow(
        &self,
        cursor: i64,
    ) -> TwitterResult<Option<IdsCursorResult>> {
        self.get_page(FRIENDSHIPS_OUTGOING, cursor).await
    }

    /// Change notification and retweet settings for a followed user.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn update_relationship(
        &self,
        update: &RelationshipUpdate,
    ) -> TwitterResult<Option<RelationshipDetailsDto>> {
        let params = update.query_params();
        let params: Vec<(&str, String)> =
            params.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        let url = self.accessor.api_endpoint(FRIENDSHIPS_UPDATE, &params)?;

        let envelope: Option<RelationshipEnvelope> =
            self.accessor.execute_request(&TwitterQuery::post(url)).await?;
        Ok(envelope.map(|e| e.relationship))
    }

    /// Connections between the authenticated user and each of `users`.
    ///
    /// An empty `users` slice returns an empty list without calling the API.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_relationships_with(
        &self,
        users: &[UserIdentifier],
    ) -> TwitterResult<Option<Vec<RelationshipStateDto>>> {
        if users.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let mut ids = Vec::new();
        let mut screen_names = Vec::new();
        for user in users {
            match user {
                UserIdentifier::Id(id) => ids.push(id.to_string()),
                UserIdentifier::ScreenName(name) => {
                    screen_names.push(name.trim_start_matches('@').to_string());
                }
            }
        }

        let mut params = Vec::new();
        if !ids.is_empty() {
            params.push(("user_id", ids.join(",")));
        }
        if !screen_names.is_empty() {
            params.push(("screen_name", screen_names.join(",")));
        }
        let url = self.accessor.api_endpoint(FRIENDSHIPS_LOOKUP, &params)?;
        self.accessor.execute_request(&TwitterQuery::get(url)).await
    }

    /// Ids of users whose retweets the authenticated user has turned off.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_user_ids_whose_retweets_are_muted(&self) -> TwitterResult<Option<Vec<u64>>> {
        let url = self.accessor.api_endpoint(FRIENDSHIPS_NO_RETWEETS_IDS, &[])?;
        self.accessor.execute_request(&TwitterQuery::get(url)).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        cursor: i64,
    ) -> TwitterResult<Option<T>> {
        let url = self
            .accessor
            .api_endpoint(path, &[("cursor", cursor.to_string())])?;
        self.accessor.execute_request(&TwitterQuery::get(url)).await
    }

    async fn post_for_user(
        &self,
        path: &str,
        user: &UserIdentifier,
    ) -> TwitterResult<Option<UserDto>> {
        let (key, value) = user.query_param("user");
        let url = self.accessor.api_endpoint(path, &[(key.as_str(), value)])?;
        self.accessor.execute_request(&TwitterQuery::post(url)).await
    }
}
