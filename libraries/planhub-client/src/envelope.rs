//! Result envelope: turns a raw `(status, body)` pair into [`ApiResult`].
//!
//! Successful responses carry their payload under `data`, failures under
//! `error`:
//!
//! ```json
//! { "success": true, "hasError": false, "statusCode": 200, "data": { ... }, "error": null }
//! ```
//!
//! The expected payload is chosen with a [`PayloadShape`]: [`Record`],
//! [`Sequence`], [`RawBytes`] or [`Empty`].

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::warn;

/// Well-known error codes produced locally when the server gave no usable one.
pub mod codes {
    /// The response body could not be interpreted.
    pub const MALFORMED_RESPONSE: &str = "MalformedResponse";
    /// A failure response carried no `error` object.
    pub const UNKNOWN_ERROR: &str = "UnknownError";
    /// A failure response had an empty body.
    pub const HTTP_ERROR: &str = "HttpError";
}

/// Structured error returned by the API.
#[derive(Error, Debug, Clone, PartialEq, Deserialize)]
#[error("{code}: {message}")]
pub struct ApiError {
    #[serde(default = "unknown_code", deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn malformed(message: impl fmt::Display) -> Self {
        Self::new(codes::MALFORMED_RESPONSE, message.to_string())
    }

    /// Whether this error was synthesized because the response was unreadable.
    pub fn is_malformed_response(&self) -> bool {
        self.code == codes::MALFORMED_RESPONSE
    }
}

fn unknown_code() -> String {
    codes::UNKNOWN_ERROR.to_string()
}

// Some endpoints send numeric codes.
fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(unknown_code()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected error code: {}",
            other
        ))),
    }
}

/// Outcome of one API call that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success { status_code: u16, data: T },
    Failure { status_code: u16, error: ApiError },
}

impl<T> ApiResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success { .. })
    }

    pub fn has_error(&self) -> bool {
        !self.is_success()
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiResult::Success { status_code, .. } | ApiResult::Failure { status_code, .. } => {
                *status_code
            }
        }
    }

    /// The payload, present only on success.
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResult::Success { data, .. } => Some(data),
            ApiResult::Failure { .. } => None,
        }
    }

    /// The error, present only on failure.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiResult::Success { .. } => None,
            ApiResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResult::Success { data, .. } => Some(data),
            ApiResult::Failure { .. } => None,
        }
    }

    /// Convert into a plain `Result` so `?` can be used on API failures.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResult::Success { data, .. } => Ok(data),
            ApiResult::Failure { error, .. } => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResult<U> {
        match self {
            ApiResult::Success { status_code, data } => ApiResult::Success {
                status_code,
                data: f(data),
            },
            ApiResult::Failure { status_code, error } => ApiResult::Failure { status_code, error },
        }
    }
}

/// Describes how the `data` of a successful response is decoded.
pub trait PayloadShape {
    type Output;

    fn extract(content: &Bytes) -> Result<Self::Output, ApiError>;
}

/// `data` is a single record.
pub struct Record<R>(PhantomData<R>);

/// `data` is an array of records, each decoded independently.
pub struct Sequence<R>(PhantomData<R>);

/// The body is returned untouched (file downloads, exports).
pub struct RawBytes;

/// The body carries nothing the caller needs (deletes, revocations).
pub struct Empty;

impl<R: DeserializeOwned> PayloadShape for Record<R> {
    type Output = R;

    fn extract(content: &Bytes) -> Result<R, ApiError> {
        let document = parse_document(content)?;
        let data = document.get("data").unwrap_or(&Value::Null);
        R::deserialize(data).map_err(|e| ApiError::malformed(format!("invalid data: {}", e)))
    }
}

impl<R: DeserializeOwned> PayloadShape for Sequence<R> {
    type Output = Vec<R>;

    fn extract(content: &Bytes) -> Result<Vec<R>, ApiError> {
        let document = parse_document(content)?;
        match document.get("data") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    R::deserialize(item).map_err(|e| {
                        ApiError::malformed(format!("invalid data[{}]: {}", index, e))
                    })
                })
                .collect(),
            Some(_) => Err(ApiError::malformed("expected `data` to be an array")),
        }
    }
}

impl PayloadShape for RawBytes {
    type Output = Bytes;

    fn extract(content: &Bytes) -> Result<Bytes, ApiError> {
        Ok(content.clone())
    }
}

impl PayloadShape for Empty {
    type Output = ();

    fn extract(_content: &Bytes) -> Result<(), ApiError> {
        Ok(())
    }
}

fn parse_document(content: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(content)
        .map_err(|e| ApiError::malformed(format!("unparseable response: {}", e)))
}

/// Interpret a raw response as the payload shape `S`.
///
/// Never fails: unreadable bodies become a [`ApiResult::Failure`] carrying a
/// [`codes::MALFORMED_RESPONSE`] error with the real status code.
pub fn interpret<S: PayloadShape>(status_code: u16, content: &Bytes) -> ApiResult<S::Output> {
    if (200..300).contains(&status_code) {
        match S::extract(content) {
            Ok(data) => ApiResult::Success { status_code, data },
            Err(error) => {
                warn!(status = status_code, error = %error, "Malformed success response");
                ApiResult::Failure { status_code, error }
            }
        }
    } else {
        ApiResult::Failure {
            status_code,
            error: extract_error(status_code, content),
        }
    }
}

fn extract_error(status_code: u16, content: &[u8]) -> ApiError {
    if content.iter().all(u8::is_ascii_whitespace) {
        let reason = StatusCode::from_u16(status_code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown status");
        return ApiError::new(
            codes::HTTP_ERROR,
            format!("HTTP {} {}", status_code, reason),
        );
    }

    let document = match parse_document(content) {
        Ok(document) => document,
        Err(error) => {
            warn!(status = status_code, "Failure response is not JSON");
            return error;
        }
    };

    match document.get("error") {
        Some(error @ Value::Object(_)) => ApiError::deserialize(error)
            .unwrap_or_else(|e| ApiError::malformed(format!("invalid error: {}", e))),
        Some(Value::String(message)) => ApiError::new(codes::UNKNOWN_ERROR, message.clone()),
        _ => ApiError::new(
            codes::UNKNOWN_ERROR,
            "response did not include an error description",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Item {
        id: String,
        #[serde(default)]
        name: Option<String>,
    }

    fn body(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn test_created_record() {
        let result = interpret::<Record<Item>>(201, &body(r#"{"data":{"id":"abc"}}"#));
        assert!(result.is_success());
        assert!(!result.has_error());
        assert!(result.error().is_none());
        assert_eq!(result.data().unwrap().id, "abc");
        assert_eq!(result.data().unwrap().name, None);
    }

    #[test]
    fn test_not_found_failure() {
        let result = interpret::<Record<Item>>(
            404,
            &body(r#"{"error":{"code":"NotFound","message":"x"}}"#),
        );
        assert!(!result.is_success());
        assert!(result.has_error());
        assert!(result.data().is_none());
        assert_eq!(result.status_code(), 404);
        let error = result.error().unwrap();
        assert_eq!(error.code, "NotFound");
        assert_eq!(error.message, "x");
    }

    #[test]
    fn test_empty_sequence() {
        let result = interpret::<Sequence<Item>>(200, &body(r#"{"data":[]}"#));
        assert_eq!(
            result,
            ApiResult::Success {
                status_code: 200,
                data: Vec::new()
            }
        );
    }

    #[test]
    fn test_null_or_missing_sequence_is_empty() {
        for content in [r#"{"data":null}"#, r#"{"success":true}"#] {
            let result = interpret::<Sequence<Item>>(200, &body(content));
            assert_eq!(
                result,
                ApiResult::Success {
                    status_code: 200,
                    data: Vec::new()
                }
            );
        }
    }

    #[test]
    fn test_error_code_of_wrong_type_is_malformed() {
        let result = interpret::<Record<Item>>(400, &body(r#"{"error":{"code":true}}"#));
        assert_eq!(result.status_code(), 400);
        let error = result.error().unwrap();
        assert!(error.is_malformed_response());
        assert!(error.message.contains("invalid error"));
    }

    #[test]
    fn test_sequence_reads_data_not_root() {
        let content = body(concat!(
            r#"{"success":true,"hasError":false,"statusCode":200,"#,
            r#""data":[{"id":"1"},{"id":"2","name":"two"}],"error":null}"#,
        ));
        let items = interpret::<Sequence<Item>>(200, &content).into_data().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name.as_deref(), Some("two"));
    }

    #[test]
    fn test_root_level_payload_is_not_used() {
        let result = interpret::<Record<Item>>(200, &body(r#"{"id":"abc"}"#));
        assert!(result.has_error());
        assert!(result.error().unwrap().is_malformed_response());
    }

    #[test]
    fn test_sequence_element_mismatch_is_malformed() {
        let result =
            interpret::<Sequence<Item>>(200, &body(r#"{"data":[{"id":"1"},{"name":"x"}]}"#));
        let error = result.error().unwrap();
        assert!(error.is_malformed_response());
        assert!(error.message.contains("data[1]"));
    }

    #[test]
    fn test_sequence_rejects_object() {
        let result = interpret::<Sequence<Item>>(200, &body(r#"{"data":{"id":"1"}}"#));
        assert!(result.error().unwrap().is_malformed_response());
    }

    #[test]
    fn test_raw_bytes_skip_json() {
        let content = Bytes::from_static(b"\x89PNG\r\n\x1a\n");
        let result = interpret::<RawBytes>(200, &content);
        assert_eq!(result.into_data().unwrap(), content);
    }

    #[test]
    fn test_empty_ignores_body() {
        assert!(interpret::<Empty>(204, &Bytes::new()).is_success());
        assert!(interpret::<Empty>(200, &body(r#"{"data":null}"#)).is_success());
    }

    #[test]
    fn test_unparseable_success_body() {
        let result = interpret::<Record<Item>>(200, &body("<html>oops</html>"));
        assert_eq!(result.status_code(), 200);
        assert!(result.data().is_none());
        assert!(result.error().unwrap().is_malformed_response());
    }

    #[test]
    fn test_unparseable_failure_body() {
        let result = interpret::<Record<Item>>(502, &body("Bad Gateway from proxy"));
        assert!(result.error().unwrap().is_malformed_response());
    }

    #[test]
    fn test_empty_failure_body_uses_reason_phrase() {
        let error = interpret::<Empty>(404, &Bytes::new()).into_result().unwrap_err();
        assert_eq!(error.code, codes::HTTP_ERROR);
        assert_eq!(error.message, "HTTP 404 Not Found");
    }

    #[test]
    fn test_missing_error_field() {
        let error = interpret::<Empty>(500, &body(r#"{"success":false}"#))
            .into_result()
            .unwrap_err();
        assert_eq!(error.code, codes::UNKNOWN_ERROR);
    }

    #[test]
    fn test_string_error_and_numeric_code() {
        let error = interpret::<Empty>(400, &body(r#"{"error":"bad input"}"#))
            .into_result()
            .unwrap_err();
        assert_eq!(error.code, codes::UNKNOWN_ERROR);
        assert_eq!(error.message, "bad input");

        let error = interpret::<Empty>(
            409,
            &body(r#"{"error":{"code":4091,"message":"conflict","details":{"field":"name"}}}"#),
        )
        .into_result()
        .unwrap_err();
        assert_eq!(error.code, "4091");
        assert_eq!(error.details.unwrap()["field"], "name");
    }

    #[test]
    fn test_failure_never_reads_data() {
        let result = interpret::<Record<Item>>(
            400,
            &body(r#"{"data":{"id":"ignored"},"error":{"code":"Invalid","message":"no"}}"#),
        );
        assert!(result.data().is_none());
        assert_eq!(result.error().unwrap().code, "Invalid");
    }

    #[test]
    fn test_map_keeps_status() {
        let result =
            interpret::<Record<Item>>(200, &body(r#"{"data":{"id":"abc"}}"#)).map(|i| i.id);
        assert_eq!(
            result,
            ApiResult::Success {
                status_code: 200,
                data: "abc".to_string()
            }
        );
    }
}
