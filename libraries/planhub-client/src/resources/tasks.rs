//! Task operations.

use super::{segment, ListOptions, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Empty, Record, Sequence};
use crate::error::Result;
use crate::query::QueryParams;
use crate::transport::ApiRequest;
use crate::types::{Task, TaskInput, TaskStatus};
use tracing::debug;

/// Filters for listing tasks in a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub list: ListOptions,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<String>,
    /// Tasks carrying any of these tags
    pub tags: Vec<String>,
    pub include_completed: bool,
}

impl TaskQuery {
    pub fn to_query(&self) -> QueryParams {
        let mut query = self.list.to_query();
        query.insert_opt("status", self.status.map(TaskStatus::as_str));
        query.insert_opt("assigneeId", self.assignee_id.as_deref());
        query.insert("tags", self.tags.clone());
        query.insert("includeCompleted", self.include_completed);
        query
    }
}

/// Task client for the Planhub API.
pub struct TasksClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> TasksClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, project_id: &str, query: &TaskQuery) -> Result<ApiResult<Vec<Task>>> {
        let path = format!("{}/projects/{}/tasks", API_PREFIX, segment(project_id)?);
        let request = ApiRequest::get(path).query(query.to_query());
        self.client.execute::<Sequence<Task>>(request).await
    }

    pub async fn get(&self, task_id: &str) -> Result<ApiResult<Task>> {
        let request = ApiRequest::get(format!("{}/tasks/{}", API_PREFIX, segment(task_id)?));
        self.client.execute::<Record<Task>>(request).await
    }

    pub async fn create(&self, project_id: &str, input: &TaskInput) -> Result<ApiResult<Task>> {
        let path = format!("{}/projects/{}/tasks", API_PREFIX, segment(project_id)?);
        let request = ApiRequest::post(path).json(input)?;
        self.client.execute::<Record<Task>>(request).await
    }

    /// Create several tasks in one call. The body is a sequence of records.
    pub async fn create_many(
        &self,
        project_id: &str,
        inputs: &[TaskInput],
    ) -> Result<ApiResult<Vec<Task>>> {
        debug!(project_id = %project_id, count = inputs.len(), "Creating tasks in batch");
        let path = format!("{}/projects/{}/tasks/batch", API_PREFIX, segment(project_id)?);
        let request = ApiRequest::post(path).json(inputs)?;
        self.client.execute::<Sequence<Task>>(request).await
    }

    pub async fn update(&self, task_id: &str, input: &TaskInput) -> Result<ApiResult<Task>> {
        let path = format!("{}/tasks/{}", API_PREFIX, segment(task_id)?);
        let request = ApiRequest::put(path).json(input)?;
        self.client.execute::<Record<Task>>(request).await
    }

    pub async fn delete(&self, task_id: &str) -> Result<ApiResult<()>> {
        let request = ApiRequest::delete(format!("{}/tasks/{}", API_PREFIX, segment(task_id)?));
        self.client.execute::<Empty>(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_query_drops_unset_filters() {
        let query = TaskQuery {
            list: ListOptions::new().top(25),
            status: Some(TaskStatus::InProgress),
            assignee_id: Some(String::new()),
            tags: vec!["backend".to_string()],
            include_completed: false,
        };

        assert_eq!(
            query.to_query().to_pairs(),
            vec![
                ("$top".to_string(), "25".to_string()),
                ("status".to_string(), "inProgress".to_string()),
                ("tags".to_string(), "backend".to_string()),
            ]
        );
    }
}
