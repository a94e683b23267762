//! Project operations.

use super::{segment, ListOptions, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Empty, RawBytes, Record, Sequence};
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::{Project, ProjectInput};
use bytes::Bytes;

/// Project client for the Planhub API.
pub struct ProjectsClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> ProjectsClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &ListOptions) -> Result<ApiResult<Vec<Project>>> {
        let request = ApiRequest::get(format!("{}/projects", API_PREFIX)).query(options.to_query());
        self.client.execute::<Sequence<Project>>(request).await
    }

    pub async fn get(&self, project_id: &str) -> Result<ApiResult<Project>> {
        let request = ApiRequest::get(format!("{}/projects/{}", API_PREFIX, segment(project_id)?));
        self.client.execute::<Record<Project>>(request).await
    }

    pub async fn create(&self, input: &ProjectInput) -> Result<ApiResult<Project>> {
        let request = ApiRequest::post(format!("{}/projects", API_PREFIX)).json(input)?;
        self.client.execute::<Record<Project>>(request).await
    }

    pub async fn update(
        &self,
        project_id: &str,
        input: &ProjectInput,
    ) -> Result<ApiResult<Project>> {
        let path = format!("{}/projects/{}", API_PREFIX, segment(project_id)?);
        let request = ApiRequest::put(path).json(input)?;
        self.client.execute::<Record<Project>>(request).await
    }

    pub async fn delete(&self, project_id: &str) -> Result<ApiResult<()>> {
        let path = format!("{}/projects/{}", API_PREFIX, segment(project_id)?);
        self.client.execute::<Empty>(ApiRequest::delete(path)).await
    }

    /// Export a project (tasks, comments, attachment metadata) as CSV bytes.
    pub async fn export(&self, project_id: &str) -> Result<ApiResult<Bytes>> {
        let path = format!("{}/projects/{}/export", API_PREFIX, segment(project_id)?);
        self.client.execute::<RawBytes>(ApiRequest::get(path)).await
    }
}
