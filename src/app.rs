//! The application: resolves a request path to a resource and calls it.
//!
//! Resolution starts at the root resource and walks the path one child at a
//! time. Each child consumes some leading segments (usually one) and the walk
//! continues with whatever is left:
//!
//! ```text
//! /users/42/posts
//!   root ──find_child(["users","42","posts"])──▶ users      rest: ["42","posts"]
//!   users ─find_child(["42","posts"])──────────▶ user 42    rest: ["posts"]
//!   user ──find_child(["posts"])───────────────▶ posts      rest: []
//!   posts.call(request)
//! ```
//!
//! A resource without a matching child ends the walk with `404 Not Found`.

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::{debug, instrument, warn};

use crate::child::Located;
use crate::request::Request;
use crate::resource::Resource;
use crate::response::Response;
use crate::status;

/// Upper bound on child lookups that consume no segments. Finders that hand
/// back their segments unconsumed would otherwise walk forever.
const MAX_STALLED_STEPS: usize = 256;

/// A resource tree, optionally mounted under a path prefix.
#[derive(Clone)]
pub struct App {
    root: Arc<Resource>,
    prefix: String,
}

impl App {
    pub fn new(root: impl Into<Arc<Resource>>) -> Self {
        Self { root: root.into(), prefix: String::new() }
    }

    /// Serves the tree under `prefix` (e.g. `/api`). Requests outside it are
    /// answered with `404`; inside it, resources see the path below it.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        self.prefix = if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") };
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Walks the request path down from the root.
    pub fn locate(&self, req: &Request) -> Located {
        let mut segments = split_path(req.path_info());
        let mut current = Arc::clone(&self.root);
        let mut stalled = 0;

        while !segments.is_empty() {
            let Some(child) = current.find_child(req, &segments) else {
                debug!(segment = %segments[0], "no child resource");
                return Located::Response(status::not_found());
            };
            match child.located {
                Located::Response(response) => return Located::Response(response),
                Located::Resource(next) => current = next,
            }
            let remaining = child.remaining.unwrap_or_default();
            if remaining.len() >= segments.len() {
                stalled += 1;
                if stalled >= MAX_STALLED_STEPS {
                    warn!(path = req.path(), "child lookup made no progress in {MAX_STALLED_STEPS} steps");
                    return Located::Response(status::not_found());
                }
            }
            segments = remaining;
        }

        Located::Resource(current)
    }

    /// Answers one request.
    #[instrument(
        level = "debug",
        name = "request",
        skip_all,
        fields(method = %req.method(), path = %req.path())
    )]
    pub async fn handle(&self, mut req: Request) -> Response {
        if !self.prefix.is_empty() {
            if !within_prefix(req.path(), &self.prefix) {
                debug!(prefix = %self.prefix, "outside application prefix");
                return status::not_found();
            }
            req.set_script_name(&self.prefix);
        }

        let response = match self.locate(&req) {
            Located::Response(response) => response,
            Located::Resource(resource) => resource.call(req).await,
        };
        debug!(status = response.status().as_u16(), "dispatched");
        response
    }
}

fn within_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Splits a path into percent-decoded segments.
///
/// One leading `/` is dropped, so the root (`""` or `"/"`) has no segments
/// while a trailing slash leaves an empty last segment.
///
/// ```
/// use restish::split_path;
/// assert_eq!(split_path("/"), Vec::<String>::new());
/// assert_eq!(split_path("/a%20b/c/"), ["a b", "c", ""]);
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/')
        .map(|seg| percent_decode_str(seg).decode_utf8_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::{Matched, Matcher};

    #[test]
    fn split_root_and_nested() {
        assert!(split_path("").is_empty());
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("/a/b"), ["a", "b"]);
        assert_eq!(split_path("a//b"), ["a", "", "b"]);
    }

    #[test]
    fn prefix_boundaries() {
        assert!(within_prefix("/api", "/api"));
        assert!(within_prefix("/api/users", "/api"));
        assert!(!within_prefix("/apix", "/api"));
        assert!(!within_prefix("/", "/api"));
    }

    #[test]
    fn prefix_is_normalised() {
        let root = Resource::new();
        assert_eq!(App::new(root.clone()).with_prefix("api/").prefix(), "/api");
        assert_eq!(App::new(root).with_prefix("/").prefix(), "");
    }

    fn looping() -> Resource {
        let stay = Matcher::custom(|_: &Request, segments: &[String]| {
            Some(Matched::new(HashMap::new(), segments.to_vec()))
        });
        Resource::new().child_with(stay, |_: &Request, _| looping())
    }

    fn descending() -> Resource {
        Resource::new()
            .get(|_req: Request| async { status::ok("leaf") })
            .child_any(|_: &Request, _| descending())
    }

    fn deep_path(depth: usize) -> String {
        "/x".repeat(depth)
    }

    #[test]
    fn deep_walks_that_consume_segments_resolve() {
        let app = App::new(descending());
        for depth in [MAX_STALLED_STEPS - 1, MAX_STALLED_STEPS, MAX_STALLED_STEPS + 1, 1000] {
            let located = app.locate(&Request::blank(&deep_path(depth)));
            assert!(matches!(located, Located::Resource(_)), "depth {depth}");
        }
    }

    #[tokio::test]
    async fn deep_walk_reaches_the_leaf_handler() {
        let app = App::new(descending());
        let res = app.handle(Request::blank(&deep_path(MAX_STALLED_STEPS))).await;
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.body().as_ref(), b"leaf");
    }

    #[test]
    fn runaway_walk_stops() {
        match App::new(looping()).locate(&Request::blank("/loop")) {
            Located::Response(r) => assert_eq!(r.status().as_u16(), 404),
            Located::Resource(_) => panic!("expected a 404"),
        }
    }
}
