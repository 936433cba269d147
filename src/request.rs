//! Incoming HTTP request type.
//!
//! Besides method, path, headers and raw body, a [`Request`] carries a set of
//! named *fields*: parsed, dynamically typed data that middleware reads and
//! rewrites. The server fills in three of them:
//!
//! | field | contents |
//! |---|---|
//! | `query` | flat `key=value` pairs from the URL, always present |
//! | `params` | route parameters, set once a route matches |
//! | `body` | the parsed body, when `content-type` is JSON and it parses |

use bytes::Bytes;
use http::Method;
use tracing::debug;

use crate::value::{Map, Value};

/// Named-field access on a request-like object.
///
/// [`NormalizeKeys`](crate::NormalizeKeys) only needs this much from a
/// request, so hosts other than [`Router`](crate::Router) can implement it
/// on their own types.
pub trait Fields {
    fn field(&self, name: &str) -> Option<&Value>;
    fn set_field(&mut self, name: &str, value: Value);
}

impl Fields for Map {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn set_field(&mut self, name: &str, value: Value) {
        self.insert(name.to_owned(), value);
    }
}

/// An incoming HTTP request.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    fields: Map,
}

impl Request {
    /// A request with no headers, no body and no fields.
    ///
    /// Use the `with_*` methods to fill it in, e.g. when driving a
    /// [`Router`](crate::Router) in-process:
    ///
    /// ```rust
    /// use http::Method;
    /// use rekey::{Request, Value};
    ///
    /// let req = Request::new(Method::GET, "/search")
    ///     .with_query("page-size=10")
    ///     .with_field("session", Value::from("abc"));
    /// assert_eq!(req.query().and_then(|q| q.get("page-size")), Some(&Value::from("10")));
    /// ```
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            fields: Map::new(),
        }
    }

    /// Builds a request from the parts hyper hands the server.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();

        let mut req = Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers,
            body: Bytes::new(),
            fields: Map::new(),
        };
        let query = parse_query(parts.uri.query().unwrap_or(""));
        req.fields.insert("query".to_owned(), Value::Object(query));
        req.with_body(body)
    }

    /// Decodes a flat query string into the `query` field, replacing it.
    pub fn with_query(mut self, raw: &str) -> Self {
        self.fields.insert("query".to_owned(), Value::Object(parse_query(raw)));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Sets the raw body. A JSON body (per `content-type`) is also parsed
    /// into the `body` field; one that does not parse is left raw.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        if !self.body.is_empty() && self.is_json() {
            match serde_json::from_slice::<Value>(&self.body) {
                Ok(parsed) => {
                    self.fields.insert("body".to_owned(), parsed);
                }
                Err(e) => debug!(path = %self.path, "body is not valid JSON: {e}"),
            }
        }
        self
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_owned(), value);
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn fields(&self) -> &Map { &self.fields }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_owned(), value);
    }

    /// The `query` field, if it is an object.
    pub fn query(&self) -> Option<&Map> {
        self.field("query").and_then(Value::as_object)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.field("params")?.get(key)?.as_str()
    }

    fn is_json(&self) -> bool {
        self.header("content-type").is_some_and(|ct| {
            let mime = ct.split(';').next().unwrap_or("").trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
    }
}

impl Fields for Request {
    fn field(&self, name: &str) -> Option<&Value> {
        Request::field(self, name)
    }

    fn set_field(&mut self, name: &str, value: Value) {
        Request::set_field(self, name, value);
    }
}

/// Decodes `a=1&b=2&a=3` into `{ a: ["1", "3"], b: "2" }`.
///
/// Keys are taken verbatim; `a[b]=c` stays a key named `a[b]`.
fn parse_query(raw: &str) -> Map {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(raw) {
        Ok(pairs) => pairs,
        Err(e) => {
            debug!("ignoring malformed query string: {e}");
            Vec::new()
        }
    };

    let mut query = Map::new();
    for (key, value) in pairs {
        match query.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                query.insert(key, Value::String(value));
            }
        }
    }
    query
}
