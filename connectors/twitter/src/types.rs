//! Twitter API v1.1 payload types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tweetkit_core::ProviderError;

// ─────────────────────────────────────────────────────────────────────────────
// User Types
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to a user by id or by handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserIdentifier {
    /// Numeric user id
    Id(u64),
    /// Handle, with or without the leading `@`
    ScreenName(String),
}

impl UserIdentifier {
    /// Query parameter naming this user, e.g. `user_id=12`.
    ///
    /// `prefix` selects the parameter family: `"user"` yields `user_id` /
    /// `screen_name`, `"owner"` yields `owner_id` / `owner_screen_name`.
    #[must_use]
    pub fn query_param(&self, prefix: &str) -> (String, String) {
        match self {
            Self::Id(id) => (format!("{prefix}_id"), id.to_string()),
            Self::ScreenName(name) => {
                let key = if prefix == "user" {
                    "screen_name".to_string()
                } else {
                    format!("{prefix}_screen_name")
                };
                (key, name.trim_start_matches('@').to_string())
            }
        }
    }
}

impl From<u64> for UserIdentifier {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for UserIdentifier {
    fn from(screen_name: &str) -> Self {
        Self::ScreenName(screen_name.to_string())
    }
}

/// Twitter user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    /// User ID
    pub id: u64,

    /// User ID as a string
    #[serde(default)]
    pub id_str: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Handle without the leading `@`
    pub screen_name: String,

    /// Whether the account is protected
    #[serde(default)]
    pub protected: bool,

    /// Whether the account is verified
    #[serde(default)]
    pub verified: bool,

    /// Profile description
    #[serde(default)]
    pub description: Option<String>,

    /// Number of followers
    #[serde(default)]
    pub followers_count: u64,

    /// Number of accounts followed
    #[serde(default)]
    pub friends_count: u64,
}

/// One page of a cursored id listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsCursorResult {
    /// Ids on this page
    #[serde(default)]
    pub ids: Vec<u64>,

    /// Cursor of the next page, `0` on the last page
    #[serde(default)]
    pub next_cursor: i64,

    /// Cursor of the previous page, `0` on the first page
    #[serde(default)]
    pub previous_cursor: i64,
}

impl IdsCursorResult {
    /// Cursor to request the first page.
    pub const FIRST_PAGE: i64 = -1;

    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_cursor != 0
    }
}

/// One page of a cursored user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersCursorResult {
    /// Users on this page
    #[serde(default)]
    pub users: Vec<UserDto>,

    /// Cursor of the next page, `0` on the last page
    #[serde(default)]
    pub next_cursor: i64,

    /// Cursor of the previous page, `0` on the first page
    #[serde(default)]
    pub previous_cursor: i64,
}

impl UsersCursorResult {
    /// Cursor to request the first page.
    pub const FIRST_PAGE: i64 = -1;

    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_cursor != 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Relationship Types
// ─────────────────────────────────────────────────────────────────────────────

/// How the authenticated user is connected to another account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    /// The authenticated user follows the account
    Following,
    /// A follow request is pending
    FollowingRequested,
    /// The account follows the authenticated user
    FollowedBy,
    /// No connection
    None,
    /// The account is blocked
    Blocking,
    /// The account is muted
    Muting,
    /// Connection not known to this crate
    #[serde(other)]
    Unknown,
}

/// Entry of a `friendships/lookup.json` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipStateDto {
    /// User ID
    pub id: u64,

    /// User ID as a string
    #[serde(default)]
    pub id_str: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Handle without the leading `@`
    pub screen_name: String,

    /// Connections from the authenticated user's point of view
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl RelationshipStateDto {
    /// Whether the authenticated user follows this account.
    #[must_use]
    pub fn following(&self) -> bool {
        self.connections.contains(&Connection::Following)
    }

    /// Whether this account follows the authenticated user.
    #[must_use]
    pub fn followed_by(&self) -> bool {
        self.connections.contains(&Connection::FollowedBy)
    }

    /// Whether a follow request to this account is pending.
    #[must_use]
    pub fn following_requested(&self) -> bool {
        self.connections.contains(&Connection::FollowingRequested)
    }
}

/// One side of a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEndDto {
    /// User ID
    pub id: u64,

    /// User ID as a string
    #[serde(default)]
    pub id_str: String,

    /// Handle without the leading `@`
    #[serde(default)]
    pub screen_name: String,

    #[serde(default)]
    pub following: bool,

    #[serde(default)]
    pub followed_by: bool,

    #[serde(default)]
    pub following_requested: bool,

    #[serde(default)]
    pub following_received: bool,

    /// Only reported on the source side
    #[serde(default)]
    pub blocking: bool,

    /// Only reported on the source side
    #[serde(default)]
    pub muting: bool,

    /// Whether retweets of the other side are shown
    #[serde(default)]
    pub want_retweets: bool,

    /// Whether device notifications are on for the other side
    #[serde(default)]
    pub notifications_enabled: bool,
}

/// Relationship between two accounts, as returned by `friendships/update.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDetailsDto {
    /// The authenticated user
    pub source: RelationshipEndDto,

    /// The other account
    pub target: RelationshipEndDto,
}

/// `{"relationship": {...}}` wrapper around [`RelationshipDetailsDto`].
#[derive(Debug, Deserialize)]
pub(crate) struct RelationshipEnvelope {
    pub relationship: RelationshipDetailsDto,
}

/// Changes to apply to the relationship with `user`.
///
/// Settings left as `None` are not sent and keep their current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipUpdate {
    /// The other account
    pub user: UserIdentifier,

    /// Device notifications for the user's tweets
    pub device: Option<bool>,

    /// Whether the user's retweets are shown
    pub retweets: Option<bool>,
}

impl RelationshipUpdate {
    /// An update that changes nothing yet.
    #[must_use]
    pub const fn new(user: UserIdentifier) -> Self {
        Self {
            user,
            device: None,
            retweets: None,
        }
    }

    /// Turn device notifications on or off.
    #[must_use]
    pub const fn with_device(mut self, enabled: bool) -> Self {
        self.device = Some(enabled);
        self
    }

    /// Show or hide the user's retweets.
    #[must_use]
    pub const fn with_retweets(mut self, enabled: bool) -> Self {
        self.retweets = Some(enabled);
        self
    }

    pub(crate) fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![self.user.query_param("user")];
        if let Some(device) = self.device {
            params.push(("device".to_string(), device.to_string()));
        }
        if let Some(retweets) = self.retweets {
            params.push(("retweets".to_string(), retweets.to_string()));
        }
        params
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// List Types
// ─────────────────────────────────────────────────────────────────────────────

/// Visibility of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMode {
    /// Visible to everyone
    #[default]
    Public,
    /// Visible to the owner only
    Private,
}

/// Twitter list object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterListDto {
    /// List ID
    pub id: u64,

    /// List ID as a string
    #[serde(default)]
    pub id_str: String,

    /// URL slug
    pub slug: String,

    /// Display name
    pub name: String,

    /// `@owner/slug`
    #[serde(default)]
    pub full_name: String,

    /// Owning user
    #[serde(rename = "user")]
    pub owner: Option<UserDto>,

    /// Creation time
    #[serde(with = "twitter_date")]
    pub created_at: DateTime<Utc>,

    /// Relative list URI
    #[serde(default)]
    pub uri: String,

    /// List description
    #[serde(default)]
    pub description: String,

    /// Whether the authenticated user follows the list
    #[serde(default)]
    pub following: bool,

    /// Visibility
    #[serde(default)]
    pub mode: PrivacyMode,

    /// Number of members
    #[serde(default)]
    pub member_count: u32,

    /// Number of subscribers
    #[serde(default)]
    pub subscriber_count: u32,
}

impl TwitterListDto {
    /// Owner id, `0` when the owner was not expanded.
    #[must_use]
    pub fn owner_id(&self) -> u64 {
        self.owner.as_ref().map_or(0, |owner| owner.id)
    }

    /// Owner handle, when the owner was expanded.
    #[must_use]
    pub fn owner_screen_name(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.screen_name.as_str())
    }
}

/// `created_at` as the v1.1 API renders it: `Wed Aug 27 13:08:45 +0000 2008`.
mod twitter_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, FORMAT)
            .map(|date| date.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Upload Types
// ─────────────────────────────────────────────────────────────────────────────

/// Server-side processing state of an uploaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    /// Queued for processing
    Pending,
    /// Being processed
    InProgress,
    /// Processing failed
    Failed,
    /// Ready to be attached
    Succeeded,
    /// State not known to this crate
    #[serde(other)]
    Undefined,
}

impl ProcessingState {
    /// Whether the state will not change anymore.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Succeeded)
    }
}

/// Error attached to a failed media processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProcessingError {
    /// Provider error code
    pub code: i32,

    /// Machine label (e.g. `InvalidMedia`)
    #[serde(default)]
    pub name: Option<String>,

    /// Human readable message
    #[serde(default)]
    pub message: String,
}

impl From<&UploadProcessingError> for ProviderError {
    fn from(error: &UploadProcessingError) -> Self {
        let provider = Self::new(error.code, &error.message);
        match &error.name {
            Some(name) => provider.with_label(name),
            None => provider,
        }
    }
}

/// Processing details of an uploaded media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProcessingInfo {
    /// Processing state
    pub state: ProcessingState,

    /// Seconds to wait before polling again
    #[serde(default)]
    pub check_after_secs: u64,

    /// Progress between 0 and 100
    #[serde(default)]
    pub progress_percent: u8,

    /// Error of a failed processing
    #[serde(default)]
    pub error: Option<UploadProcessingError>,
}

impl UploadProcessingInfo {
    /// Delay to wait before polling the status again.
    #[must_use]
    pub const fn check_after(&self) -> Duration {
        Duration::from_secs(self.check_after_secs)
    }
}

/// Response of `media/upload.json?command=STATUS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Media ID
    pub media_id: u64,

    /// Media ID as a string
    #[serde(default)]
    pub media_id_string: String,

    /// Seconds until the upload expires
    #[serde(default)]
    pub expires_after_secs: Option<u64>,

    /// Processing details, absent for media that needs no processing
    #[serde(default)]
    pub processing_info: Option<UploadProcessingInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn list_json() -> serde_json::Value {
        json!({
            "id": 715_919_216_927_322_112_u64,
            "id_str": "715919216927322112",
            "slug": "rustaceans",
            "name": "Rustaceans",
            "full_name": "@jack/rustaceans",
            "user": {"id": 12, "id_str": "12", "name": "jack", "screen_name": "jack"},
            "created_at": "Fri Apr 01 14:02:43 +0000 2016",
            "uri": "/jack/lists/rustaceans",
            "description": "",
            "following": false,
            "mode": "private",
            "member_count": 3,
            "subscriber_count": 1
        })
    }

    #[test]
    fn test_user_identifier_params() {
        assert_eq!(
            UserIdentifier::from(42_u64).query_param("user"),
            ("user_id".to_string(), "42".to_string())
        );
        assert_eq!(
            UserIdentifier::from("@jack").query_param("user"),
            ("screen_name".to_string(), "jack".to_string())
        );
        assert_eq!(
            UserIdentifier::from("jack").query_param("owner"),
            ("owner_screen_name".to_string(), "jack".to_string())
        );
    }

    #[test]
    fn test_list_deserialize() {
        let list: TwitterListDto = serde_json::from_value(list_json()).unwrap();

        assert_eq!(list.slug, "rustaceans");
        assert_eq!(list.mode, PrivacyMode::Private);
        assert_eq!(list.owner_id(), 12);
        assert_eq!(list.owner_screen_name(), Some("jack"));
        assert_eq!(list.created_at.year(), 2016);
        assert_eq!(list.created_at.hour(), 14);
    }

    #[test]
    fn test_list_created_at_serializes_in_api_format() {
        let list: TwitterListDto = serde_json::from_value(list_json()).unwrap();
        let value = serde_json::to_value(&list).unwrap();

        assert_eq!(value["created_at"], "Fri Apr 01 14:02:43 +0000 2016");
    }

    #[test]
    fn test_list_without_owner() {
        let mut raw = list_json();
        raw.as_object_mut().unwrap().remove("user");
        let list: TwitterListDto = serde_json::from_value(raw).unwrap();

        assert_eq!(list.owner_id(), 0);
        assert!(list.owner_screen_name().is_none());
    }

    #[test]
    fn test_ids_cursor_pages() {
        let page: IdsCursorResult =
            serde_json::from_value(json!({"ids": [1, 2], "next_cursor": 0, "previous_cursor": -3}))
                .unwrap();

        assert_eq!(page.ids, vec![1, 2]);
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_users_cursor_page() {
        let page: UsersCursorResult = serde_json::from_value(json!({
            "users": [{"id": 7, "screen_name": "muted"}],
            "next_cursor": 99,
            "previous_cursor": 0
        }))
        .unwrap();

        assert_eq!(page.users[0].screen_name, "muted");
        assert!(page.has_next_page());
    }

    #[test]
    fn test_relationship_state_connections() {
        let state: RelationshipStateDto = serde_json::from_value(json!({
            "id": 783_214,
            "id_str": "783214",
            "name": "Twitter",
            "screen_name": "Twitter",
            "connections": ["following", "followed_by", "smothering"]
        }))
        .unwrap();

        assert!(state.following());
        assert!(state.followed_by());
        assert!(!state.following_requested());
        assert_eq!(state.connections[2], Connection::Unknown);
    }

    #[test]
    fn test_relationship_envelope() {
        let envelope: RelationshipEnvelope = serde_json::from_value(json!({
            "relationship": {
                "source": {"id": 1, "screen_name": "me", "following": true, "want_retweets": false, "notifications_enabled": true},
                "target": {"id": 2, "screen_name": "you", "followed_by": true}
            }
        }))
        .unwrap();

        let relationship = envelope.relationship;
        assert!(relationship.source.following);
        assert!(relationship.source.notifications_enabled);
        assert!(!relationship.source.blocking);
        assert_eq!(relationship.target.screen_name, "you");
        assert!(relationship.target.followed_by);
    }

    #[test]
    fn test_relationship_update_params() {
        let update = RelationshipUpdate::new(UserIdentifier::from("@jack")).with_retweets(false);

        assert_eq!(
            update.query_params(),
            vec![
                ("screen_name".to_string(), "jack".to_string()),
                ("retweets".to_string(), "false".to_string()),
            ]
        );
        assert_eq!(
            RelationshipUpdate::new(UserIdentifier::from(3_u64))
                .with_device(true)
                .query_params()
                .len(),
            2
        );
    }

    #[test]
    fn test_upload_status_in_progress() {
        let status: UploadStatus = serde_json::from_value(json!({
            "media_id": 710_511_363_345_354_753_u64,
            "media_id_string": "710511363345354753",
            "expires_after_secs": 3595,
            "processing_info": {"state": "in_progress", "check_after_secs": 10, "progress_percent": 8}
        }))
        .unwrap();

        let info = status.processing_info.unwrap();
        assert_eq!(info.state, ProcessingState::InProgress);
        assert!(!info.state.is_terminal());
        assert_eq!(info.check_after(), Duration::from_secs(10));
        assert_eq!(info.progress_percent, 8);
        assert!(info.error.is_none());
    }

    #[test]
    fn test_unknown_processing_state() {
        let info: UploadProcessingInfo =
            serde_json::from_value(json!({"state": "transcoding"})).unwrap();

        assert_eq!(info.state, ProcessingState::Undefined);
        assert_eq!(info.check_after(), Duration::ZERO);
    }

    #[test]
    fn test_processing_error_to_provider_error() {
        let error = UploadProcessingError {
            code: 1,
            name: Some("InvalidMedia".into()),
            message: "Unsupported video format".into(),
        };

        let provider = ProviderError::from(&error);

        assert_eq!(provider.code, 1);
        assert_eq!(provider.message, "Unsupported video format");
        assert_eq!(provider.label.as_deref(), Some("InvalidMedia"));
    }
}
