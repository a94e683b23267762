//! Main Planhub client.

use crate::config::{ClientConfig, ClientSettings};
use crate::envelope::{interpret, ApiResult, PayloadShape, Record};
use crate::error::Result;
use crate::resources::{
    AttachmentsClient, AuthClient, CommentsClient, ProjectsClient, TasksClient, UsersClient,
};
use crate::transport::{ApiRequest, Transport};
use crate::types::{AccessToken, ServerInfo, TokenRequest};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Main client for interacting with the Planhub API.
///
/// Holds the transport (base URL, identifying headers, bearer credential) and
/// hands out per-resource clients. Every operation returns
/// `Result<ApiResult<T>>`: the outer `Err` means no response was obtained, the
/// inner [`ApiResult`] carries whatever the server answered.
///
/// # Example
///
/// ```ignore
/// use planhub_client::{ClientConfig, ListOptions, PlanhubClient};
///
/// let client = PlanhubClient::new(ClientConfig::new("production", "nightly-report"))?;
/// client.set_bearer_token("token").await;
///
/// let projects = client.projects().list(&ListOptions::new().top(10)).await?;
/// match projects.into_result() {
///     Ok(projects) => println!("{} projects", projects.len()),
///     Err(error) => eprintln!("API error {}: {}", error.code, error.message),
/// }
/// ```
pub struct PlanhubClient {
    transport: Transport,
}

impl PlanhubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        debug!(config = ?config, "Creating Planhub client");
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    /// Create a client that sends through a caller-provided HTTP client.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Result<Self> {
        Ok(Self {
            transport: Transport::with_http_client(config, http)?,
        })
    }

    /// Create a client from `planhub.toml` / `PLANHUB_*` settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::new(ClientConfig::from_settings(settings))
    }

    /// Get the server URL.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Check if the client has a bearer credential.
    pub async fn is_authenticated(&self) -> bool {
        self.transport.access_token().await.is_some()
    }

    /// Set or replace the bearer credential used by subsequent requests.
    pub async fn set_bearer_token(&self, token: impl Into<String>) {
        self.transport.set_access_token(Some(token.into())).await;
        info!("Bearer token configured");
    }

    /// Clear the stored credential; later requests carry no Authorization header.
    pub async fn clear_bearer_token(&self) {
        self.transport.set_access_token(None).await;
        info!("Bearer token cleared");
    }

    /// Send a request and interpret the response as payload shape `S`.
    pub async fn execute<S: PayloadShape>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResult<S::Output>> {
        let raw = self.transport.send_request(&request).await?;
        let result = interpret::<S>(raw.status, &raw.content);

        if let Some(error) = result.error() {
            debug!(
                method = %request.method,
                path = %request.path,
                status = raw.status,
                code = %error.code,
                "Request failed"
            );
        }

        Ok(result)
    }

    /// Fetch deployment information. Does not require authentication.
    pub async fn server_info(&self) -> Result<ApiResult<ServerInfo>> {
        let result = self.execute::<Record<ServerInfo>>(ApiRequest::get("/info")).await?;

        if let Some(info) = result.data() {
            info!(name = %info.name, version = %info.version, "Connected to server");
        }

        Ok(result)
    }

    /// Issue an access token and, on success, use it for subsequent requests.
    pub async fn login(&self, credentials: &TokenRequest) -> Result<ApiResult<AccessToken>> {
        let result = self.auth().issue_token(credentials).await?;

        match &result {
            ApiResult::Success { data, .. } => {
                self.transport.set_access_token(Some(data.token.clone())).await;
                info!(client_id = %credentials.client_id, token_id = %data.id, "Login successful");
            }
            ApiResult::Failure { error, .. } => {
                warn!(client_id = %credentials.client_id, code = %error.code, "Login failed");
            }
        }

        Ok(result)
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    pub fn projects(&self) -> ProjectsClient<'_> {
        ProjectsClient::new(self)
    }

    pub fn tasks(&self) -> TasksClient<'_> {
        TasksClient::new(self)
    }

    pub fn comments(&self) -> CommentsClient<'_> {
        CommentsClient::new(self)
    }

    pub fn attachments(&self) -> AttachmentsClient<'_> {
        AttachmentsClient::new(self)
    }

    pub fn users(&self) -> UsersClient<'_> {
        UsersClient::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlanhubClient>();
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let client = PlanhubClient::new(ClientConfig::new("local", "unit-tests")).unwrap();
        assert!(!client.is_authenticated().await);

        client.set_bearer_token("first").await;
        client.set_bearer_token("second").await;
        assert_eq!(
            client.transport().access_token().await.as_deref(),
            Some("second")
        );

        client.clear_bearer_token().await;
        assert!(!client.is_authenticated().await);
    }

    #[test]
    fn test_environment_resolution() {
        let client = PlanhubClient::new(ClientConfig::new("production", "unit-tests")).unwrap();
        assert_eq!(client.base_url(), "https://api.planhub.io");
    }
}
