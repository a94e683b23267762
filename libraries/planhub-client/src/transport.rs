//! HTTP transport: one network call per request, no payload interpretation.

use crate::body::to_compact_json;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::query::QueryParams;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::sync::RwLock;
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

/// Multipart field name that carries uploaded files.
pub const UPLOAD_FIELD: &str = "file";

const SDK_NAME_HEADER: &str = "sdkname";
const SDK_VERSION_HEADER: &str = "sdkversion";
const MACHINE_NAME_HEADER: &str = "machinename";
const APPLICATION_NAME_HEADER: &str = "applicationname";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API request described as plain data.
///
/// `path` is server-relative and already has identifiers substituted. At most
/// one of `body` and `file` may be set.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub query: QueryParams,
    pub file: Option<PathBuf>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
            file: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Attach a record (or sequence of records) as the JSON body, with empty
    /// members removed.
    pub fn json<T: Serialize + ?Sized>(mut self, record: &T) -> Result<Self> {
        self.body = Some(to_compact_json(record)?);
        Ok(self)
    }

    /// Upload the file at `path` as multipart form data.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

/// Raw status and body returned by the server.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content: Bytes,
}

/// Sends [`ApiRequest`]s with the identifying and auth headers attached.
pub struct Transport {
    http: Client,
    base_url: String,
    identity: HeaderMap,
    access_token: RwLock<Option<String>>,
}

impl Transport {
    /// Create a transport with a default HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", config.sdk_name(), config.sdk_version()))
            .build()
            .map_err(ClientError::Request)?;
        Self::with_http_client(config, http)
    }

    /// Create a transport on top of a caller-provided HTTP client, e.g. one
    /// with custom timeouts or pooling.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let identity = identity_headers(&config)?;

        Ok(Self {
            http,
            base_url,
            identity,
            access_token: RwLock::new(config.access_token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace (or clear, with `None`) the bearer credential.
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Perform exactly one HTTP round trip.
    ///
    /// Any status code is returned as data; only failures to obtain a response
    /// are errors.
    pub async fn send_request(&self, request: &ApiRequest) -> Result<RawResponse> {
        if request.body.is_some() && request.file.is_some() {
            return Err(ClientError::InvalidRequest(
                "a request cannot carry both a JSON body and a file".into(),
            ));
        }

        let url = self.url_for(&request.path, &request.query)?;
        let token = self.access_token.read().await.clone();

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .headers(self.identity.clone());

        if let Some(token) = token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        } else if let Some(file_path) = &request.file {
            builder = builder.multipart(file_form(file_path).await?);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            "Sending request"
        );

        let response = builder.send().await.map_err(ClientError::from_send)?;
        let status = response.status().as_u16();
        let content = response.bytes().await?;

        debug!(
            method = %request.method,
            path = %request.path,
            status = status,
            bytes = content.len(),
            "Received response"
        );

        Ok(RawResponse { status, content })
    }

    fn url_for(&self, path: &str, query: &QueryParams) -> Result<Url> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{}{}", self.base_url, separator, path))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))?;

        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = raw.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    Ok(url)
}

fn identity_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|_| ClientError::InvalidHeader(v.to_string()))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(HeaderName::from_static(SDK_NAME_HEADER), value(config.sdk_name())?);
    headers.insert(HeaderName::from_static(SDK_VERSION_HEADER), value(config.sdk_version())?);
    headers.insert(HeaderName::from_static(MACHINE_NAME_HEADER), value(&config.machine_name)?);
    headers.insert(
        HeaderName::from_static(APPLICATION_NAME_HEADER),
        value(&config.application_name)?,
    );
    Ok(headers)
}

/// Build a multipart form that streams the file. The file handle lives inside
/// the request body and is closed when the request completes or fails.
async fn file_form(path: &Path) -> Result<Form> {
    if !path.exists() {
        return Err(ClientError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let file = File::open(path).await?;
    let length = file.metadata().await?.len();

    debug!(file = %path.display(), size = length, "Streaming upload");

    let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
        .file_name(file_name)
        .mime_str(mime_type_for_file(path))?;

    Ok(Form::new().part(UPLOAD_FIELD, part))
}

/// Get MIME type for an attachment.
fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("txt") | Some("log") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> ClientConfig {
        ClientConfig::new(url, "unit-tests").with_machine_name("test-host")
    }

    #[test]
    fn test_url_validation() {
        assert!(Transport::new(config("https://example.com")).is_ok());
        assert!(Transport::new(config("http://localhost:8080")).is_ok());
        assert!(Transport::new(config("production")).is_ok());

        assert!(Transport::new(config("")).is_err());
        assert!(Transport::new(config("not-a-url")).is_err());
        assert!(Transport::new(config("ftp://example.com")).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let transport = Transport::new(config("https://example.com///")).unwrap();
        assert_eq!(transport.base_url(), "https://example.com");
    }

    #[test]
    fn test_url_for_joins_path_and_query() {
        let transport = Transport::new(config("https://example.com/")).unwrap();
        let query = QueryParams::new()
            .with("$top", 10)
            .with("$skip", 0)
            .with("$filter", "");

        let url = transport.url_for("/api/v1/projects", &query).unwrap();
        assert_eq!(url.path(), "/api/v1/projects");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("$top".to_string(), "10".to_string())]);

        let url = transport.url_for("api/v1/users/me", &QueryParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1/users/me");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_control_characters_in_header_rejected() {
        let mut cfg = config("https://example.com");
        cfg.application_name = "line\nbreak".to_string();
        assert!(matches!(
            Transport::new(cfg),
            Err(ClientError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_request_builder_compacts_body() {
        #[derive(Serialize)]
        struct Draft {
            name: &'static str,
            notes: Option<String>,
        }

        let request = ApiRequest::post("/api/v1/projects")
            .json(&Draft {
                name: "Launch",
                notes: None,
            })
            .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body, Some(serde_json::json!({ "name": "Launch" })));
        assert!(request.file.is_none());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("invoice.pdf")), "application/pdf");
        assert_eq!(mime_type_for_file(Path::new("shot.PNG")), "image/png");
        assert_eq!(mime_type_for_file(Path::new("data.csv")), "text/csv");
        assert_eq!(
            mime_type_for_file(Path::new("blob.unknown")),
            "application/octet-stream"
        );
    }
}
