//! Relative URL building on top of [`url::Url`].
//!
//! Resources often link to their neighbours. Starting from
//! [`Request::path_url`](crate::Request::path_url):
//!
//! ```
//! use restish::{Request, UrlExt};
//!
//! let here = Request::blank("/users/42").with_header("host", "example.com").path_url().unwrap();
//! assert_eq!(here.child("posts").as_str(), "http://example.com/users/42/posts");
//! assert_eq!(here.sibling("43").as_str(), "http://example.com/users/43");
//! assert_eq!(here.root().as_str(), "http://example.com/");
//! ```
//!
//! URLs that cannot be a base (e.g. `mailto:`) are returned unchanged.

use percent_encoding::percent_decode_str;
use url::Url;

pub trait UrlExt {
    /// Appends `segment` (percent-encoded) to the path. A trailing slash does
    /// not produce an empty segment.
    fn child(&self, segment: &str) -> Url;

    /// Replaces the last path segment with `segment`.
    fn sibling(&self, segment: &str) -> Url;

    /// The same origin with path `/`, no query and no fragment.
    fn root(&self) -> Url;

    /// The path split into decoded segments.
    fn path_segments_decoded(&self) -> Vec<String>;
}

impl UrlExt for Url {
    fn child(&self, segment: &str) -> Url {
        let mut url = without_query(self);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }

    fn sibling(&self, segment: &str) -> Url {
        let mut url = without_query(self);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop().push(segment);
        }
        url
    }

    fn root(&self) -> Url {
        let mut url = without_query(self);
        url.set_path("/");
        url
    }

    fn path_segments_decoded(&self) -> Vec<String> {
        self.path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn without_query(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url
}
