//! List queries.

use std::sync::Arc;

use tracing::instrument;
use tweetkit_core::TwitterQuery;

use crate::{
    accessor::TwitterAccessor,
    error::TwitterResult,
    types::{TwitterListDto, UserIdentifier},
};

const LISTS_SHOW: &str = "1.1/lists/show.json";

/// Reference to a list, by id or by its owner and slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListIdentifier {
    /// Numeric list id
    Id(u64),
    /// Owner and URL slug
    Slug {
        /// Owning user
        owner: UserIdentifier,
        /// List slug
        slug: String,
    },
}

impl ListIdentifier {
    /// Identify a list by its owner and slug.
    #[must_use]
    pub fn slug(owner: impl Into<UserIdentifier>, slug: impl Into<String>) -> Self {
        Self::Slug {
            owner: owner.into(),
            slug: slug.into(),
        }
    }

    fn query_params(&self) -> Vec<(String, String)> {
        match self {
            Self::Id(id) => vec![("list_id".to_string(), id.to_string())],
            Self::Slug { owner, slug } => {
                vec![("slug".to_string(), slug.clone()), owner.query_param("owner")]
            }
        }
    }
}

impl From<u64> for ListIdentifier {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

/// Executes list queries.
#[derive(Debug, Clone)]
pub struct ListsQueryExecutor {
    accessor: Arc<TwitterAccessor>,
}

impl ListsQueryExecutor {
    /// Create an executor on top of `accessor`.
    #[must_use]
    pub const fn new(accessor: Arc<TwitterAccessor>) -> Self {
        Self { accessor }
    }

    /// Fetch a single list.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_list(&self, list: &ListIdentifier) -> TwitterResult<Option<TwitterListDto>> {
        let params = list.query_params();
        let params: Vec<(&str, String)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        let url = self.accessor.api_endpoint(LISTS_SHOW, &params)?;
        self.accessor.execute_request(&TwitterQuery::get(url)).await
    }
}
