//! Error types.
//!
//! Two families live here. [`ClientError`] is an application-level failure
//! that becomes a 4xx [`Response`](crate::Response): return it from a handler
//! or a child finder and the caller sees the matching status. [`Error`]
//! surfaces infrastructure failures: loading settings, binding a port.

use crate::response::{IntoResponse, Response};
use crate::status;

/// The error type returned by restish's fallible infrastructure operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// A typed HTTP client error.
///
/// ```rust
/// use restish::{ClientError, Request, Response, status};
///
/// async fn delete(req: Request) -> Result<Response, ClientError> {
///     if req.header("authorization").is_none() {
///         return Err(ClientError::Unauthorized);
///     }
///     Ok(status::ok("deleted"))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("400 Bad Request")]
    BadRequest,
    #[error("401 Unauthorized")]
    Unauthorized,
    #[error("403 Forbidden")]
    Forbidden,
    #[error("404 Not Found")]
    NotFound,
    #[error("405 Method Not Allowed")]
    MethodNotAllowed { allow: String },
    #[error("406 Not Acceptable")]
    NotAcceptable,
    #[error("409 Conflict")]
    Conflict,
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let body = self.to_string();
        match self {
            Self::BadRequest => status::bad_request(),
            Self::NotFound => status::not_found(),
            Self::MethodNotAllowed { allow } => status::method_not_allowed(&allow),
            Self::Unauthorized => status::unauthorized(body).with_header("content-type", "text/plain"),
            Self::Forbidden => status::forbidden(body).with_header("content-type", "text/plain"),
            Self::NotAcceptable => status::not_acceptable(body).with_header("content-type", "text/plain"),
            Self::Conflict => status::conflict(body).with_header("content-type", "text/plain"),
        }
    }
}
