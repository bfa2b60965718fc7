//! Child resource matching.
//!
//! While walking a path, the [`App`](crate::App) hands the remaining segments
//! to the current resource. Each child registration pairs a [`Matcher`],
//! which decides whether it applies and how many segments it consumes, with a
//! finder closure that builds the next step of the walk.

use std::collections::HashMap;
use std::sync::Arc;

use crate::request::Request;
use crate::resource::Resource;
use crate::response::{IntoResponse, Response};

type CustomMatch = Arc<dyn Fn(&Request, &[String]) -> Option<Matched> + Send + Sync>;
pub(crate) type Finder = Arc<dyn Fn(&Request, Matched) -> Option<Child> + Send + Sync>;

// ── Matcher ───────────────────────────────────────────────────────────────────

/// Decides whether a child registration applies to the remaining segments.
#[derive(Clone)]
pub struct Matcher(Kind);

#[derive(Clone)]
enum Kind {
    Template(Vec<Part>),
    Any,
    Custom(CustomMatch),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Part {
    Literal(String),
    Capture(String),
}

impl Matcher {
    /// A `/`-separated pattern of literal segments and `{name}` captures.
    ///
    /// `"users"` matches one literal segment, `"users/{id}"` matches two and
    /// captures the second as `id`. The empty pattern matches the empty
    /// segment left by a trailing slash.
    pub fn template(pattern: &str) -> Self {
        let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
        let parts = pattern
            .split('/')
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Part::Capture(name.to_owned()),
                None => Part::Literal(seg.to_owned()),
            })
            .collect();
        Self(Kind::Template(parts))
    }

    /// Matches any single segment, captured as `segment`.
    pub fn any() -> Self {
        Self(Kind::Any)
    }

    /// Matching logic of your own. Return the captures and the segments left
    /// for the next resource.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Request, &[String]) -> Option<Matched> + Send + Sync + 'static,
    {
        Self(Kind::Custom(Arc::new(f)))
    }

    /// Ordering key: more segments first, then more literals. Custom matchers
    /// rank last.
    pub(crate) fn score(&self) -> (usize, usize) {
        match &self.0 {
            Kind::Template(parts) => {
                let literals = parts.iter().filter(|p| matches!(p, Part::Literal(_))).count();
                (parts.len(), literals)
            }
            Kind::Any => (1, 0),
            Kind::Custom(_) => (0, 0),
        }
    }

    pub(crate) fn matches(&self, req: &Request, segments: &[String]) -> Option<Matched> {
        match &self.0 {
            Kind::Template(parts) => {
                if segments.len() < parts.len() {
                    return None;
                }
                let mut params = HashMap::new();
                for (part, segment) in parts.iter().zip(segments) {
                    match part {
                        Part::Literal(lit) if lit == segment => {}
                        Part::Literal(_) => return None,
                        Part::Capture(name) => {
                            params.insert(name.clone(), segment.clone());
                        }
                    }
                }
                Some(Matched { params, remaining: segments[parts.len()..].to_vec() })
            }
            Kind::Any => {
                let (first, rest) = segments.split_first()?;
                let params = HashMap::from([("segment".to_owned(), first.clone())]);
                Some(Matched { params, remaining: rest.to_vec() })
            }
            Kind::Custom(f) => f(req, segments),
        }
    }
}

impl From<&str> for Matcher {
    fn from(pattern: &str) -> Self {
        Self::template(pattern)
    }
}

// ── Matched ───────────────────────────────────────────────────────────────────

/// The outcome of a successful match, handed to the child finder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matched {
    pub params: HashMap<String, String>,
    pub remaining: Vec<String>,
}

impl Matched {
    pub fn new(params: HashMap<String, String>, remaining: Vec<String>) -> Self {
        Self { params, remaining }
    }

    /// A captured value, e.g. `id` for the template `users/{id}`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Segments not consumed by the matcher.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }
}

// ── Child ─────────────────────────────────────────────────────────────────────

/// Where the path walk goes next.
pub enum Located {
    Resource(Arc<Resource>),
    /// Stop walking and send this response as is.
    Response(Response),
}

/// A child found by a resource: the next step plus, optionally, the segments
/// it leaves for further lookup. Without an explicit list the segments the
/// matcher did not consume are used.
pub struct Child {
    pub(crate) located: Located,
    pub(crate) remaining: Option<Vec<String>>,
}

impl Child {
    pub fn resource(resource: impl Into<Arc<Resource>>) -> Self {
        Self { located: Located::Resource(resource.into()), remaining: None }
    }

    pub fn response(response: impl IntoResponse) -> Self {
        Self { located: Located::Response(response.into_response()), remaining: None }
    }

    /// Overrides which segments are still to be resolved. Pass an empty list
    /// to consume the rest of the path.
    pub fn with_remaining(mut self, segments: Vec<String>) -> Self {
        self.remaining = Some(segments);
        self
    }
}

/// Conversion of a child finder's return value into an optional [`Child`].
///
/// `None` (or a finder that returns nothing) means "no such child": the walk
/// ends with `404 Not Found`.
pub trait IntoChild {
    fn into_child(self) -> Option<Child>;
}

impl IntoChild for Child {
    fn into_child(self) -> Option<Child> { Some(self) }
}

impl IntoChild for Resource {
    fn into_child(self) -> Option<Child> { Some(Child::resource(self)) }
}

impl IntoChild for Arc<Resource> {
    fn into_child(self) -> Option<Child> { Some(Child::resource(self)) }
}

impl IntoChild for Response {
    fn into_child(self) -> Option<Child> { Some(Child::response(self)) }
}

/// A resource and the segments it leaves.
impl IntoChild for (Resource, Vec<String>) {
    fn into_child(self) -> Option<Child> {
        Some(Child::resource(self.0).with_remaining(self.1))
    }
}

impl<T: IntoChild> IntoChild for Option<T> {
    fn into_child(self) -> Option<Child> {
        self.and_then(IntoChild::into_child)
    }
}

/// `Err` ends the walk with the error's response.
impl<T, E> IntoChild for Result<T, E>
where
    T: IntoChild,
    E: IntoResponse,
{
    fn into_child(self) -> Option<Child> {
        match self {
            Ok(v) => v.into_child(),
            Err(e) => Some(Child::response(e)),
        }
    }
}
