//! Per-resource clients.
//!
//! Every operation follows the same template: build the path, optionally a
//! query and a compacted body, send it, and interpret the response with a
//! fixed payload shape.

mod attachments;
mod auth;
mod comments;
mod projects;
mod tasks;
mod users;

pub use attachments::AttachmentsClient;
pub use auth::AuthClient;
pub use comments::CommentsClient;
pub use projects::ProjectsClient;
pub use tasks::{TaskQuery, TasksClient};
pub use users::UsersClient;

use crate::error::{ClientError, Result};
use crate::query::QueryParams;
use std::borrow::Cow;

/// Path prefix of every versioned endpoint.
pub(crate) const API_PREFIX: &str = "/api/v1";

/// Percent-encode an identifier as exactly one path segment.
///
/// `/`, `?` and `#` are escaped. Empty and dot-segment identifiers would
/// change which resource the path names, so they are rejected.
pub(crate) fn segment(id: &str) -> Result<Cow<'_, str>> {
    if matches!(id, "" | "." | "..") {
        return Err(ClientError::InvalidRequest(format!(
            "invalid resource identifier: {:?}",
            id
        )));
    }
    Ok(urlencoding::encode(id))
}

/// Paging, filtering and projection options shared by list endpoints.
///
/// `filter` and `orderby` are passed through verbatim; the client does not
/// parse or validate them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub select: Vec<String>,
    pub count: bool,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn orderby(mut self, orderby: impl Into<String>) -> Self {
        self.orderby = Some(orderby.into());
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    pub fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("$top", self.top)
            .with_opt("$skip", self.skip)
            .with_opt("$filter", self.filter.as_deref())
            .with_opt("$orderby", self.orderby.as_deref())
            .with("$select", self.select.clone())
            .with("$count", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_encoding() {
        let query = ListOptions::new()
            .top(10)
            .skip(0)
            .filter("")
            .select(["id", "name"])
            .to_query();

        assert_eq!(
            query.to_pairs(),
            vec![
                ("$top".to_string(), "10".to_string()),
                ("$select".to_string(), "id".to_string()),
                ("$select".to_string(), "name".to_string()),
            ]
        );
    }

    #[test]
    fn test_segment_escapes_url_syntax() {
        assert_eq!(segment("prj-1").unwrap(), "prj-1");
        assert_eq!(segment("t#frag").unwrap(), "t%23frag");
        assert_eq!(segment("a?b=1").unwrap(), "a%3Fb%3D1");
        assert_eq!(segment("../projects/p9").unwrap(), "..%2Fprojects%2Fp9");
        assert_eq!(segment("50%").unwrap(), "50%25");
    }

    #[test]
    fn test_segment_rejects_empty_and_dot_segments() {
        for id in ["", ".", ".."] {
            assert!(matches!(segment(id), Err(ClientError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_default_list_options_are_empty() {
        assert!(ListOptions::default().to_query().is_empty());
    }
}
