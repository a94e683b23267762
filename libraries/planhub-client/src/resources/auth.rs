//! Access-token issuance and revocation.

use super::{segment, API_PREFIX};
use crate::client::PlanhubClient;
use crate::envelope::{ApiResult, Empty, Record};
use crate::error::Result;
use crate::transport::ApiRequest;
use crate::types::{AccessToken, TokenRequest};
use tracing::debug;

/// Authentication client for the Planhub API.
pub struct AuthClient<'a> {
    client: &'a PlanhubClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(client: &'a PlanhubClient) -> Self {
        Self { client }
    }

    /// Exchange client credentials for an access token.
    ///
    /// The token is not stored; use `PlanhubClient::login` for that.
    pub async fn issue_token(&self, credentials: &TokenRequest) -> Result<ApiResult<AccessToken>> {
        debug!(client_id = %credentials.client_id, "Requesting access token");
        let request = ApiRequest::post(format!("{}/auth/tokens", API_PREFIX)).json(credentials)?;
        self.client.execute::<Record<AccessToken>>(request).await
    }

    pub async fn revoke_token(&self, token_id: &str) -> Result<ApiResult<()>> {
        let path = format!("{}/auth/tokens/{}", API_PREFIX, segment(token_id)?);
        self.client.execute::<Empty>(ApiRequest::delete(path)).await
    }
}
