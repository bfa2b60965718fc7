//! Constructors for the standard HTTP responses a resource hands back.
//!
//! ```rust
//! use restish::status;
//!
//! status::ok("hello").with_header("content-type", "text/plain");
//! status::created("/users/42", r#"{"id":42}"#);
//! status::see_other("/login");
//! status::not_found();
//! ```
//!
//! Helpers that take a body add no headers; attach them with
//! [`Response::with_header`](crate::Response::with_header). The error helpers
//! without a body argument fill in a `text/plain` body like `404 Not Found`.

use bytes::Bytes;
use http::StatusCode;

use crate::response::Response;

// ── Successful 2xx ────────────────────────────────────────────────────────────

pub fn ok(body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::OK, body)
}

/// `201 Created` pointing at the new resource.
pub fn created(location: &str, body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::CREATED, body).with_header("location", location)
}

// ── Redirection 3xx ───────────────────────────────────────────────────────────

pub fn moved_permanently(location: &str) -> Response {
    redirect(StatusCode::MOVED_PERMANENTLY, location)
}

pub fn found(location: &str) -> Response {
    redirect(StatusCode::FOUND, location)
}

pub fn see_other(location: &str) -> Response {
    redirect(StatusCode::SEE_OTHER, location)
}

pub fn not_modified() -> Response {
    Response::new(StatusCode::NOT_MODIFIED, Bytes::new())
}

fn redirect(code: StatusCode, location: &str) -> Response {
    Response::new(code, Bytes::new()).with_header("location", location)
}

// ── Client Error 4xx ──────────────────────────────────────────────────────────

/// `400 Bad Request` with a plain-text body.
pub fn bad_request() -> Response {
    plain(StatusCode::BAD_REQUEST)
}

pub fn unauthorized(body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::UNAUTHORIZED, body)
}

pub fn forbidden(body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::FORBIDDEN, body)
}

/// `404 Not Found` with a plain-text body.
pub fn not_found() -> Response {
    plain(StatusCode::NOT_FOUND)
}

/// `405 Method Not Allowed`. `allow` is the comma-separated list of methods
/// the resource does handle, sent back in the `Allow` header.
pub fn method_not_allowed(allow: &str) -> Response {
    plain(StatusCode::METHOD_NOT_ALLOWED).with_header("allow", allow)
}

pub fn not_acceptable(body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::NOT_ACCEPTABLE, body)
}

pub fn conflict(body: impl Into<Bytes>) -> Response {
    Response::new(StatusCode::CONFLICT, body)
}

fn plain(code: StatusCode) -> Response {
    let body = format!("{} {}", code.as_u16(), code.canonical_reason().unwrap_or(""));
    Response::new(code, body).with_header("content-type", "text/plain")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sets_location() {
        let res = created("/things/1", "{}");
        assert_eq!(res.status_line(), "201 Created");
        assert_eq!(res.header("location"), Some("/things/1"));
        assert_eq!(res.body().as_ref(), b"{}");
    }

    #[test]
    fn redirects_have_empty_bodies() {
        for (res, code) in [
            (moved_permanently("/a"), 301),
            (found("/a"), 302),
            (see_other("/a"), 303),
        ] {
            assert_eq!(res.status().as_u16(), code);
            assert_eq!(res.header("location"), Some("/a"));
            assert!(res.body().is_empty());
        }
        assert!(not_modified().headers().is_empty());
    }

    #[test]
    fn defaults_for_bodiless_errors() {
        let res = bad_request();
        assert_eq!(res.content_type(), Some("text/plain"));
        assert_eq!(res.body().as_ref(), b"400 Bad Request");

        let res = method_not_allowed("GET, POST");
        assert_eq!(res.body().as_ref(), b"405 Method Not Allowed");
        assert_eq!(res.header("allow"), Some("GET, POST"));
    }

    #[test]
    fn body_errors_carry_no_headers() {
        let res = forbidden("nope");
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(res.headers().is_empty());
        assert_eq!(not_acceptable("x").status().as_u16(), 406);
        assert_eq!(unauthorized("x").status().as_u16(), 401);
    }
}
