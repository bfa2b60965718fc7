//! Resources: method dispatch, content negotiation and child registration.
//!
//! A [`Resource`] is one node of the URL hierarchy. It answers requests for
//! its own path through handlers registered per method, and names the
//! children that resolve deeper paths.
//!
//! ```rust
//! use restish::{Matched, Request, Resource, Route, status};
//!
//! fn user(id: String) -> Resource {
//!     let json = id.clone();
//!     Resource::new()
//!         .route(Route::get().accept("html"), move |_req: Request| {
//!             let body = format!("<h1>{id}</h1>");
//!             async move { status::ok(body) }
//!         })
//!         .route(Route::get().accept("json"), move |_req: Request| {
//!             let body = format!(r#"{{"id":"{json}"}}"#);
//!             async move { status::ok(body) }
//!         })
//! }
//!
//! let root = Resource::new()
//!     .child("users/{id}", |_req: &Request, m: Matched| m.param("id").map(|id| user(id.to_owned())));
//! ```
//!
//! # Choosing a handler
//!
//! 1. Handlers registered for the request method are candidates. Without any,
//!    `ALL` handlers are; without those the answer is `405` listing the
//!    methods that are handled.
//! 2. A non-empty request `Content-Type` drops handlers that do not consume it.
//! 3. A non-empty `Accept` header picks the best declared type
//!    ([`accept::best_match`](crate::accept::best_match)) and keeps the
//!    handlers declaring it. Without one, the first candidate and its first
//!    declared type win.
//! 4. No candidate left: `406`.
//!
//! When the handler's response has no `Content-Type` and the negotiated type
//! is concrete (no `*`), it is filled in.

use std::sync::Arc;

use tracing::debug;

use crate::accept::{self, MediaRange};
use crate::child::{Child, IntoChild, Matched, Matcher, Finder};
use crate::error::ClientError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::mime;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status;

const ANY_TYPE: &str = "*/*";

// ── Route ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Verb {
    Method(Method),
    All,
}

/// Describes when a handler applies: the method, the types it can produce
/// (`accept`) and the request bodies it consumes (`content_type`).
///
/// Short names such as `"json"` expand to full MIME types. Declaring nothing
/// means `*/*`.
#[derive(Clone, Debug)]
pub struct Route {
    verb: Verb,
    accept: Vec<String>,
    content_type: Vec<String>,
}

impl Route {
    pub fn new(method: Method) -> Self {
        Self { verb: Verb::Method(method), accept: Vec::new(), content_type: Vec::new() }
    }

    /// Matches any method the resource has no specific handler for.
    pub fn all() -> Self {
        Self { verb: Verb::All, accept: Vec::new(), content_type: Vec::new() }
    }

    pub fn get() -> Self { Self::new(Method::Get) }
    pub fn post() -> Self { Self::new(Method::Post) }
    pub fn put() -> Self { Self::new(Method::Put) }
    pub fn delete() -> Self { Self::new(Method::Delete) }
    pub fn head() -> Self { Self::new(Method::Head) }
    pub fn patch() -> Self { Self::new(Method::Patch) }
    pub fn options() -> Self { Self::new(Method::Options) }

    /// Adds a type this handler produces. Earlier declarations win ties.
    pub fn accept(mut self, mime: &str) -> Self {
        self.accept.push(mime::normalise(mime));
        self
    }

    /// Adds a request body type this handler consumes.
    pub fn content_type(mut self, mime: &str) -> Self {
        self.content_type.push(mime::normalise(mime));
        self
    }
}

// ── Resource ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Dispatcher {
    accept: Vec<String>,
    content_type: Vec<String>,
    handler: BoxedHandler,
}

impl Dispatcher {
    /// A request carries one `Content-Type`, so it is parsed whole: commas in
    /// quoted parameters stay put.
    fn consumes(&self, content_type: &MediaRange) -> bool {
        self.content_type.iter().any(|declared| {
            accept::fitness_and_quality(&MediaRange::parse(declared), std::slice::from_ref(content_type))
                .is_some_and(|(q, _)| q > 0.0)
        })
    }
}

#[derive(Clone)]
struct ChildRoute {
    matcher: Matcher,
    finder: Finder,
}

/// One node of the URL hierarchy. See the [module docs](self).
#[derive(Clone, Default)]
pub struct Resource {
    // Registration order is kept: it drives `Allow` and tie-breaking.
    dispatchers: Vec<(Verb, Vec<Dispatcher>)>,
    children: Vec<ChildRoute>,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `route`. Returns `self` for chaining.
    pub fn route(mut self, route: Route, handler: impl Handler) -> Self {
        let or_any = |mut types: Vec<String>| {
            if types.is_empty() {
                types.push(ANY_TYPE.to_owned());
            }
            types
        };
        let dispatcher = Dispatcher {
            accept: or_any(route.accept),
            content_type: or_any(route.content_type),
            handler: handler.into_boxed_handler(),
        };
        match self.dispatchers.iter_mut().find(|(verb, _)| *verb == route.verb) {
            Some((_, list)) => list.push(dispatcher),
            None => self.dispatchers.push((route.verb, vec![dispatcher])),
        }
        self
    }

    pub fn get(self, handler: impl Handler) -> Self { self.route(Route::get(), handler) }
    pub fn post(self, handler: impl Handler) -> Self { self.route(Route::post(), handler) }
    pub fn put(self, handler: impl Handler) -> Self { self.route(Route::put(), handler) }
    pub fn delete(self, handler: impl Handler) -> Self { self.route(Route::delete(), handler) }

    /// Handles every method without a more specific handler.
    pub fn all(self, handler: impl Handler) -> Self { self.route(Route::all(), handler) }

    /// Registers a child for a template such as `"users/{id}"`.
    pub fn child<F, C>(self, template: &str, finder: F) -> Self
    where
        F: Fn(&Request, Matched) -> C + Send + Sync + 'static,
        C: IntoChild,
    {
        self.child_with(Matcher::template(template), finder)
    }

    /// Registers a child for any single segment, available as
    /// `matched.param("segment")`.
    pub fn child_any<F, C>(self, finder: F) -> Self
    where
        F: Fn(&Request, Matched) -> C + Send + Sync + 'static,
        C: IntoChild,
    {
        self.child_with(Matcher::any(), finder)
    }

    pub fn child_with<F, C>(mut self, matcher: Matcher, finder: F) -> Self
    where
        F: Fn(&Request, Matched) -> C + Send + Sync + 'static,
        C: IntoChild,
    {
        let finder: Finder = Arc::new(move |req: &Request, matched: Matched| finder(req, matched).into_child());
        self.children.push(ChildRoute { matcher, finder });
        // Stable: equal scores keep registration order.
        self.children.sort_by(|a, b| b.matcher.score().cmp(&a.matcher.score()));
        self
    }

    /// Looks up the child for the leading `segments`.
    ///
    /// The first matcher that applies decides; its finder's answer is final.
    /// The returned child always carries its remaining segments.
    pub fn find_child(&self, req: &Request, segments: &[String]) -> Option<Child> {
        let (route, matched) = self
            .children
            .iter()
            .find_map(|route| route.matcher.matches(req, segments).map(|m| (route, m)))?;
        let unconsumed = matched.remaining.clone();
        let mut child = (route.finder)(req, matched)?;
        child.remaining.get_or_insert(unconsumed);
        Some(child)
    }

    /// Methods with a specific handler, in registration order.
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.dispatchers
            .iter()
            .filter_map(|(verb, _)| match verb {
                Verb::Method(m) => Some(*m),
                Verb::All => None,
            })
            .collect()
    }

    /// Answers a request for this resource.
    pub async fn call(&self, req: Request) -> Response {
        let Some(candidates) = self.dispatchers_for(req.method()) else {
            let allow = self
                .allowed_methods()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            debug!(method = %req.method(), allow = %allow, "no handler for method");
            return status::method_not_allowed(&allow);
        };

        let Some((dispatcher, negotiated)) = negotiate(candidates, &req) else {
            debug!(
                accept = req.header("accept").unwrap_or(""),
                content_type = req.header("content-type").unwrap_or(""),
                "no acceptable handler"
            );
            return ClientError::NotAcceptable.into_response();
        };

        let mut response = dispatcher.handler.call(req).await;
        if response.content_type().is_none() && !negotiated.contains('*') {
            response.set_header("content-type", negotiated);
        }
        response
    }

    fn dispatchers_for(&self, method: &http::Method) -> Option<&[Dispatcher]> {
        let find = |wanted: Verb| {
            self.dispatchers
                .iter()
                .find(|(verb, _)| *verb == wanted)
                .map(|(_, list)| list.as_slice())
        };
        Method::from_http(method)
            .and_then(|m| find(Verb::Method(m)))
            .or_else(|| find(Verb::All))
    }
}

/// Picks the dispatcher for `req` and the type it was chosen for.
fn negotiate<'a>(dispatchers: &'a [Dispatcher], req: &Request) -> Option<(&'a Dispatcher, &'a str)> {
    let mut candidates: Vec<&'a Dispatcher> = dispatchers.iter().collect();

    if let Some(content_type) = non_blank(req.header("content-type")) {
        let content_type = MediaRange::parse(content_type);
        candidates.retain(|d| d.consumes(&content_type));
    }

    let Some(accept_header) = non_blank(req.header("accept")) else {
        let first = candidates.into_iter().next()?;
        return first.accept.first().map(|t| (first, t.as_str()));
    };

    let supported: Vec<&str> = candidates
        .iter()
        .flat_map(|&d| d.accept.iter().map(String::as_str))
        .collect();
    let best = accept::best_match(&supported, accept_header)?;
    candidates
        .into_iter()
        .find_map(|d| d.accept.iter().find(|t| *t == best).map(|t| (d, t.as_str())))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
