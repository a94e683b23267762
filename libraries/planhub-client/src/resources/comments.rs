//! Task comment operations.

use super::{segment, ListOptions, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Empty, Record, Sequence};
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::{Comment, CommentInput};

/// Comment client for the Planhub API.
pub struct CommentsClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> CommentsClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        task_id: &str,
        options: &ListOptions,
    ) -> Result<ApiResult<Vec<Comment>>> {
        let path = format!("{}/tasks/{}/comments", API_PREFIX, segment(task_id)?);
        let request = ApiRequest::get(path).query(options.to_query());
        self.client.execute::<Sequence<Comment>>(request).await
    }

    pub async fn create(&self, task_id: &str, input: &CommentInput) -> Result<ApiResult<Comment>> {
        let path = format!("{}/tasks/{}/comments", API_PREFIX, segment(task_id)?);
        let request = ApiRequest::post(path).json(input)?;
        self.client.execute::<Record<Comment>>(request).await
    }

    pub async fn delete(&self, comment_id: &str) -> Result<ApiResult<()>> {
        let path = format!("{}/comments/{}", API_PREFIX, segment(comment_id)?);
        self.client.execute::<Empty>(ApiRequest::delete(path)).await
    }
}
