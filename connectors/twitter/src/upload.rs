//! Media upload status queries.

use std::sync::Arc;

use tracing::{debug, instrument};
use tweetkit_core::{ProviderError, TwitterQuery};

use crate::{accessor::TwitterAccessor, error::TwitterResult, types::UploadStatus};

const MEDIA_UPLOAD: &str = "1.1/media/upload.json";

/// Executes upload queries against the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadQueryExecutor {
    accessor: Arc<TwitterAccessor>,
}

impl UploadQueryExecutor {
    /// Create an executor on top of `accessor`.
    #[must_use]
    pub const fn new(accessor: Arc<TwitterAccessor>) -> Self {
        Self { accessor }
    }

    /// Processing status of an uploaded media.
    ///
    /// A processing error reported inside a successful response is handled
    /// like a failed call: recorded per the log policy, then swallowed or
    /// raised.
    ///
    /// # Errors
    ///
    /// See [`TwitterAccessor::execute_request`].
    #[instrument(skip(self))]
    pub async fn get_upload_status(&self, media_id: u64) -> TwitterResult<Option<UploadStatus>> {
        let url = self.accessor.upload_endpoint(
            MEDIA_UPLOAD,
            &[("command", "STATUS".to_string()), ("media_id", media_id.to_string())],
        )?;
        let query = TwitterQuery::get(url);

        let Some(status) = self.accessor.execute_request::<UploadStatus>(&query).await? else {
            return Ok(None);
        };

        let processing_error = status
            .processing_info
            .as_ref()
            .and_then(|info| info.error.as_ref());
        if let Some(error) = processing_error {
            debug!(media_id, code = error.code, "Media processing failed");
            let exception = self
                .accessor
                .handler()
                .record_provider_errors_if_enabled(&[ProviderError::from(error)], &query.url);
            return self.accessor.swallow_or_raise(exception);
        }

        Ok(Some(status))
    }
}
