//! Request handling module that provides access to the parts of a request used for resolution.
//!
//! This module contains the core types for reading an incoming request:
//! - `RequestContext`: Provides access to the method, the path and the query parameters
//! - `QueryParams`: Handles the key/value pairs decoded from the query string

use http::{Method, Request};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::HashMap;

/// Represents the context of an HTTP request as seen by the resolver.
///
/// The lifetime parameter ensures that the request context does not outlive the
/// request data it references.
#[derive(Debug, Clone)]
pub struct RequestContext<'req> {
    method: &'req Method,
    path: Cow<'req, str>,
    query: QueryParams,
}

impl<'req> RequestContext<'req> {
    /// Creates a new RequestContext from already decoded parts
    pub fn new(method: &'req Method, path: impl Into<Cow<'req, str>>, query: QueryParams) -> Self {
        Self { method, path: path.into(), query }
    }

    /// Creates a RequestContext from an `http::Request`, decoding its path and query string
    ///
    /// The path is percent-decoded once, invalid UTF-8 sequences become `U+FFFD`.
    pub fn from_request<B>(request: &'req Request<B>) -> Result<Self, serde_urlencoded::de::Error> {
        let uri = request.uri();
        let query = match uri.query() {
            Some(query) => QueryParams::parse(query)?,
            None => QueryParams::empty(),
        };

        let path = percent_decode_str(uri.path()).decode_utf8_lossy();
        Ok(Self::new(request.method(), path, query))
    }

    /// Returns the HTTP method of the request
    pub fn method(&self) -> &Method {
        self.method
    }

    /// Returns the decoded path of the request, without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a reference to the query parameters of the request
    pub fn query(&self) -> &QueryParams {
        &self.query
    }
}

/// Represents the query parameters of an HTTP request.
///
/// Keys are unique; when a query string repeats a key, its last value is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Creates an empty QueryParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string, without the leading `?`
    pub fn parse(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)?;
        Ok(pairs.into_iter().collect())
    }

    /// Returns true if there are no query parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of query parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Gets the raw value of a query parameter by its key
    /// Returns None if the parameter doesn't exist
    #[inline]
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.params.get(key.as_ref()).map(String::as_str)
    }

    #[inline]
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.params.contains_key(key.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query() {
        let query = QueryParams::parse("hey=true&what=false&name=hello%20world").unwrap();

        assert_eq!(query.len(), 3);
        assert_eq!(query.get("hey"), Some("true"));
        assert_eq!(query.get("what"), Some("false"));
        assert_eq!(query.get("name"), Some("hello world"));
        assert_eq!(query.get("missing"), None);
        assert!(query.contains_key("hey"));
    }

    #[test]
    fn parse_query_repeated_key() {
        let query = QueryParams::parse("a=1&b=2&a=3").unwrap();

        assert_eq!(query.len(), 2);
        assert_eq!(query.get("a"), Some("3"));
    }

    #[test]
    fn parse_query_without_value() {
        let query = QueryParams::parse("flag").unwrap();
        assert_eq!(query.get("flag"), Some(""));
    }

    #[test]
    fn from_request_with_query() {
        let request = Request::get("/foo?hey=true").body(()).unwrap();
        let ctx = RequestContext::from_request(&request).unwrap();

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/foo");
        assert_eq!(ctx.query().get("hey"), Some("true"));
    }

    #[test]
    fn from_request_without_query() {
        let request = Request::get("/foo").body(()).unwrap();
        let ctx = RequestContext::from_request(&request).unwrap();

        assert_eq!(ctx.path(), "/foo");
        assert!(ctx.query().is_empty());
    }

    #[test]
    fn from_request_decodes_path() {
        let request = Request::get("/hello%20world?name=a%20b").body(()).unwrap();
        let ctx = RequestContext::from_request(&request).unwrap();
        assert_eq!(ctx.path(), "/hello world");
        assert_eq!(ctx.query().get("name"), Some("a b"));

        let request = Request::get("/caf%C3%A9").body(()).unwrap();
        assert_eq!(RequestContext::from_request(&request).unwrap().path(), "/café");

        // decoded once only
        let request = Request::get("/a%2520b").body(()).unwrap();
        assert_eq!(RequestContext::from_request(&request).unwrap().path(), "/a%20b");

        let request = Request::get("/bad%FF").body(()).unwrap();
        assert_eq!(RequestContext::from_request(&request).unwrap().path(), "/bad\u{FFFD}");
    }

    #[test]
    fn new_keeps_path_as_is() {
        let method = Method::GET;
        let ctx = RequestContext::new(&method, "/a%20b", QueryParams::empty());
        assert_eq!(ctx.path(), "/a%20b");

        let ctx = RequestContext::new(&method, String::from("/owned"), QueryParams::empty());
        assert_eq!(ctx.path(), "/owned");
    }

    #[test]
    fn from_request_with_empty_query() {
        let request = Request::get("/foo?").body(()).unwrap();
        let ctx = RequestContext::from_request(&request).unwrap();

        assert!(ctx.query().is_empty());
    }
}
