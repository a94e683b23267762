//! Query-string parameters.
//!
//! Parameters whose value is falsy (empty string, zero, `false`, empty
//! sequence) are dropped before encoding. This means "send `$top=0`" and "do
//! not filter on `$top`" cannot be told apart; callers that need an explicit
//! zero have no way to express it. This matches the service contract as it
//! stands and should be raised with the API owners rather than changed here.

use url::form_urlencoded;

/// A single query-parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Encoded as the same key repeated once per element.
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Whether this value is dropped from the encoded query.
    pub fn is_falsy(&self) -> bool {
        match self {
            QueryValue::Str(s) => s.is_empty(),
            QueryValue::Int(i) => *i == 0,
            QueryValue::Float(f) => *f == 0.0,
            QueryValue::Bool(b) => !b,
            QueryValue::List(items) => items.iter().all(QueryValue::is_falsy),
        }
    }

    fn push_encoded(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            _ if self.is_falsy() => {}
            QueryValue::Str(s) => out.push((key.to_string(), s.clone())),
            QueryValue::Int(i) => out.push((key.to_string(), i.to_string())),
            QueryValue::Float(f) => out.push((key.to_string(), f.to_string())),
            QueryValue::Bool(b) => out.push((key.to_string(), b.to_string())),
            QueryValue::List(items) => {
                for item in items {
                    item.push_encoded(key, out);
                }
            }
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::Str(v.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

macro_rules! int_query_value {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(v: $t) -> Self {
                QueryValue::Int(i64::from(v))
            }
        })*
    };
}

int_query_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for QueryValue {
    fn from(v: u64) -> Self {
        QueryValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<usize> for QueryValue {
    fn from(v: usize) -> Self {
        QueryValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(v: Vec<T>) -> Self {
        QueryValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Ordered mapping of query-parameter names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Falsy values are kept here and dropped on encoding.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.push((key.into(), value.into()));
    }

    /// Add a parameter only when `value` is `Some`.
    pub fn insert_opt<V: Into<QueryValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder form of [`QueryParams::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`QueryParams::insert_opt`].
    pub fn with_opt<V: Into<QueryValue>>(
        mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.insert_opt(key, value);
        self
    }

    /// Name/value pairs that survive falsy-value omission, in insertion order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            value.push_encoded(key, &mut out);
        }
        out
    }

    /// True when encoding would produce no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.params.iter().all(|(_, v)| v.is_falsy())
    }

    /// URL-encoded query string without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
