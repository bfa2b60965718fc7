//! Incoming HTTP request type.

use bytes::Bytes;
use http::header::{HOST, HeaderMap, HeaderName, HeaderValue};
use http::request::Parts;
use http::Uri;
use tracing::warn;
use url::Url;

/// An incoming HTTP request with its body already collected.
///
/// Besides the raw parts, a request knows the path prefix the application is
/// mounted under (its *script name*). [`path_info`](Request::path_info) is the
/// path relative to that prefix and is what resources are resolved against.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    body: Bytes,
    script_name: String,
}

impl Request {
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self { parts, body, script_name: String::new() }
    }

    /// A `GET` request for `uri` with no headers and an empty body.
    ///
    /// Handy for tests and tools that drive an [`App`](crate::App) directly:
    ///
    /// ```
    /// use restish::Request;
    ///
    /// let req = Request::blank("/users/42?full=1")
    ///     .with_method(http::Method::PUT)
    ///     .with_header("accept", "application/json");
    /// assert_eq!(req.path(), "/users/42");
    /// assert_eq!(req.header("Accept"), Some("application/json"));
    /// ```
    ///
    /// An unparsable `uri` falls back to `/`.
    pub fn blank(uri: &str) -> Self {
        let uri = uri.parse::<Uri>().unwrap_or_else(|_| Uri::from_static("/"));
        let mut req = http::Request::new(Bytes::new());
        *req.uri_mut() = uri;
        Self::from_http(req)
    }

    pub fn with_method(mut self, method: http::Method) -> Self {
        self.parts.method = method;
        self
    }

    /// Appends a header. Invalid names or values are logged and dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(n), Ok(v)) => {
                self.parts.headers.append(n, v);
            }
            _ => warn!(header = name, "dropping invalid request header"),
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn set_script_name(&mut self, prefix: &str) {
        self.script_name = prefix.trim_end_matches('/').to_owned();
    }

    pub fn method(&self) -> &http::Method { &self.parts.method }
    pub fn uri(&self) -> &Uri { &self.parts.uri }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn query(&self) -> Option<&str> { self.parts.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Request extensions, for data attached by the embedding application.
    pub fn extensions(&self) -> &http::Extensions { &self.parts.extensions }

    /// Case-insensitive header lookup. Non-UTF-8 values are reported as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The path prefix the application is mounted under, without a trailing
    /// slash (`""` at the root).
    pub fn script_name(&self) -> &str { &self.script_name }

    /// The path below [`script_name`](Request::script_name).
    pub fn path_info(&self) -> &str {
        self.path().strip_prefix(self.script_name.as_str()).unwrap_or_else(|| self.path())
    }

    // ── URL helpers ──────────────────────────────────────────────────────────

    /// `scheme://host[:port]/`.
    pub fn host_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}://{}/", self.scheme(), self.host()))
    }

    /// The URL of the application root (host URL plus script name).
    pub fn application_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.host_url()?;
        url.set_path(&format!("{}/", self.script_name));
        Ok(url)
    }

    /// The full URL without the query string.
    pub fn path_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.host_url()?;
        url.set_path(self.path());
        Ok(url)
    }

    /// The full URL including the query string.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.path_url()?;
        url.set_query(self.query());
        Ok(url)
    }

    /// Path and query, e.g. `/search?q=rust`.
    pub fn path_qs(&self) -> String {
        match self.query() {
            Some(q) => format!("{}?{q}", self.path()),
            None => self.path().to_owned(),
        }
    }

    fn scheme(&self) -> &str {
        if let Some(scheme) = self.parts.uri.scheme_str() {
            return scheme;
        }
        match self.header("x-forwarded-proto") {
            Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        }
    }

    fn host(&self) -> &str {
        if let Some(authority) = self.parts.uri.authority() {
            return authority.as_str();
        }
        self.header(HOST.as_str()).unwrap_or("localhost")
    }
}
