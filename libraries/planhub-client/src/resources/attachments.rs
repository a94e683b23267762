//! Attachment upload and download.

use super::{segment, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Empty, RawBytes, Record, Sequence};
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::Attachment;
use bytes::Bytes;
use std::path::Path;
use tracing::info;

/// Attachment client for the Planhub API.
pub struct AttachmentsClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> AttachmentsClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, task_id: &str) -> Result<ApiResult<Vec<Attachment>>> {
        let path = format!("{}/tasks/{}/attachments", API_PREFIX, segment(task_id)?);
        self.client
            .execute::<Sequence<Attachment>>(ApiRequest::get(path))
            .await
    }

    /// Upload a file and attach it to a task.
    ///
    /// Fails with `ClientError::FileNotFound` before any request is made if the
    /// file does not exist.
    pub async fn upload(&self, task_id: &str, file_path: &Path) -> Result<ApiResult<Attachment>> {
        let path = format!("{}/tasks/{}/attachments", API_PREFIX, segment(task_id)?);
        let request = ApiRequest::post(path).file(file_path);
        let result = self.client.execute::<Record<Attachment>>(request).await?;

        if let Some(attachment) = result.data() {
            info!(
                task_id = %task_id,
                attachment_id = %attachment.id,
                file = %file_path.display(),
                size = attachment.size,
                "Attachment uploaded"
            );
        }

        Ok(result)
    }

    /// Download the raw content of an attachment.
    pub async fn download(&self, attachment_id: &str) -> Result<ApiResult<Bytes>> {
        let path = format!("{}/attachments/{}/content", API_PREFIX, segment(attachment_id)?);
        self.client.execute::<RawBytes>(ApiRequest::get(path)).await
    }

    pub async fn delete(&self, attachment_id: &str) -> Result<ApiResult<()>> {
        let path = format!("{}/attachments/{}", API_PREFIX, segment(attachment_id)?);
        self.client.execute::<Empty>(ApiRequest::delete(path)).await
    }
}
