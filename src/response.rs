//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler (usually through the
//! [`status`](crate::status) helpers) and return it.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use tracing::warn;

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use restish::{Response, status};
/// use http::StatusCode;
///
/// status::ok("<p>hi</p>").with_header("content-type", "text/html");
///
/// Response::builder()
///     .status(StatusCode::ACCEPTED)
///     .header("location", "/jobs/7")
///     .body("queued");
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Response {
    /// A response with the given status, no headers and `body`.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    /// Builder for responses that need a custom status or several headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { response: Self::new(StatusCode::OK, Bytes::new()) }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Status code and reason phrase, e.g. `"405 Method Not Allowed"`.
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{} {reason}", self.status.as_u16()),
            None => self.status.as_u16().to_string(),
        }
    }

    /// Case-insensitive header lookup. Non-UTF-8 values are reported as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Appends a header. Invalid names or values are logged and dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Replaces every value of `name` with `value`.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.insert(name, value);
        }
    }

    /// Converts into the `http` crate's response type for hyper.
    pub fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let parsed_name = HeaderName::from_bytes(name.as_bytes());
    let parsed_value = HeaderValue::from_str(value);
    match (parsed_name, parsed_value) {
        (Ok(n), Ok(v)) => Some((n, v)),
        _ => {
            warn!(header = name, "dropping invalid response header");
            None
        }
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK` with no body.
pub struct ResponseBuilder {
    response: Response,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.response.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.response = self.response.with_header(name, value);
        self
    }

    /// Terminate with a body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Response {
        self.response.body = body.into();
        self.response
    }

    /// Terminate with no body (e.g. `304 Not Modified`).
    pub fn no_body(self) -> Response {
        self.response
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

/// A `200` body with no `Content-Type`; the negotiated type fills it in.
impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Response::new(StatusCode::OK, self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::new(StatusCode::OK, self)
    }
}

/// Return a bare status from a handler: `return StatusCode::NO_CONTENT`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::new(self, Bytes::new()) }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
