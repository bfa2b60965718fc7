//! # restish
//!
//! Resource-oriented HTTP on top of hyper. You describe a tree of
//! [`Resource`]s; restish walks the request path down that tree, then picks
//! the handler whose method and declared content types best fit the request.
//!
//! - **Child lookup**: each resource names its children with templates like
//!   `"users/{id}"`. Finders build the child on demand, so the tree can be as
//!   dynamic as the data behind it.
//! - **Content negotiation**: handlers declare what they produce
//!   (`Route::get().accept("json")`); the client's `Accept` header and its
//!   `q` weights choose between them. The negotiated type becomes the
//!   response `Content-Type` unless the handler set one.
//! - **Status helpers**: [`status::ok`], [`status::created`],
//!   [`status::not_found`] and friends, plus [`ClientError`] for early
//!   returns with `?`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use restish::{App, ClientError, Matched, Request, Resource, Route, Server, status};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restish::Error> {
//!     let root = Resource::new()
//!         .get(|_req: Request| async { status::ok("welcome") })
//!         .child("users/{id}", |_req: &Request, m: Matched| {
//!             let id = m.param("id").unwrap_or_default().to_owned();
//!             user(id)
//!         });
//!
//!     Server::bind("0.0.0.0:3000".parse().unwrap())
//!         .serve(App::new(root))
//!         .await
//! }
//!
//! fn user(id: String) -> Result<Resource, ClientError> {
//!     if id.parse::<u64>().is_err() {
//!         return Err(ClientError::NotFound);
//!     }
//!     Ok(Resource::new().route(Route::get().accept("json"), move |_req: Request| {
//!         let body = format!(r#"{{"id":{id}}}"#);
//!         async move { status::ok(body) }
//!     }))
//! }
//! ```

mod app;
mod child;
mod error;
mod handler;
mod method;
mod request;
mod resource;
mod response;
mod server;
mod settings;

pub mod accept;
pub mod logging;
pub mod mime;
pub mod status;
pub mod url;

pub use app::{App, split_path};
pub use child::{Child, IntoChild, Located, Matched, Matcher};
pub use error::{ClientError, Error};
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::Request;
pub use resource::{Resource, Route};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::Server;
pub use settings::{LoggingSettings, ServerSettings, Settings, setup_app};
pub use crate::url::UrlExt;
