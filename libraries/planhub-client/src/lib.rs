//! Planhub Client
//!
//! HTTP client library for the Planhub project-management API.
//!
//! # Features
//!
//! - **Transport**: base URL resolution, identifying headers, bearer auth,
//!   JSON bodies, query strings and streamed multipart uploads
//! - **Result envelope**: every response becomes an [`ApiResult`], either a
//!   typed payload or a structured [`ApiError`]
//! - **Resources**: projects, tasks, comments, attachments, users and tokens
//!
//! Network failures are returned as `Err(ClientError)`. Anything the server
//! answered, including 4xx/5xx and unreadable bodies, is `Ok(ApiResult)`.
//!
//! # Example
//!
//! ```ignore
//! use planhub_client::{ClientConfig, PlanhubClient, TaskQuery, TokenRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlanhubClient::new(ClientConfig::new("production", "sync-job"))?;
//!
//!     let login = client
//!         .login(&TokenRequest {
//!             client_id: "id".into(),
//!             client_secret: "secret".into(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     login.into_result()?;
//!
//!     let tasks = client.tasks().list("prj-1", &TaskQuery::default()).await?;
//!     for task in tasks.into_result()? {
//!         println!("{} {}", task.id, task.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod body;
mod client;
mod config;
mod envelope;
mod error;
mod query;
mod resources;
mod transport;
mod types;

// Re-export main types
pub use body::{compact, to_compact_json};
pub use client::PlanhubClient;
pub use crate::config::{
    local_machine_name, ClientConfig, ClientSettings, Environment, SDK_NAME, SDK_VERSION,
};
pub use envelope::{
    codes, interpret, ApiError, ApiResult, Empty, PayloadShape, RawBytes, Record, Sequence,
};
pub use error::{ClientError, Result};
pub use query::{QueryParams, QueryValue};
pub use transport::{ApiRequest, HttpMethod, RawResponse, Transport, UPLOAD_FIELD};
pub use types::{
    AccessToken, Attachment, Comment, CommentInput, Project, ProjectInput, ServerInfo, Task,
    TaskInput, TaskStatus, TokenRequest, User,
};

// Re-export sub-clients for direct use if needed
pub use resources::{
    AttachmentsClient, AuthClient, CommentsClient, ListOptions, ProjectsClient, TaskQuery,
    TasksClient, UsersClient,
};
