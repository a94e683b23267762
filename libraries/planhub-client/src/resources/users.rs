//! User directory operations.

use super::{segment, ListOptions, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Record, Sequence};
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::User;

/// User client for the Planhub API.
pub struct UsersClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    /// The user the current credential belongs to.
    pub async fn me(&self) -> Result<ApiResult<User>> {
        let request = ApiRequest::get(format!("{}/users/me", API_PREFIX));
        self.client.execute::<Record<User>>(request).await
    }

    pub async fn list(&self, options: &ListOptions) -> Result<ApiResult<Vec<User>>> {
        let request = ApiRequest::get(format!("{}/users", API_PREFIX)).query(options.to_query());
        self.client.execute::<Sequence<User>>(request).await
    }

    pub async fn get(&self, user_id: &str) -> Result<ApiResult<User>> {
        let request = ApiRequest::get(format!("{}/users/{}", API_PREFIX, segment(user_id)?));
        self.client.execute::<Record<User>>(request).await
    }
}
