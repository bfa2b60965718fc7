//! `Accept` header parsing and quality-weighted matching.
//!
//! A client sends a list of media ranges, each with an optional `q` weight:
//!
//! ```text
//! Accept: text/html;q=0.9, application/json, */*;q=0.1
//! ```
//!
//! For every type the server can produce, the most specific range that
//! covers it decides its quality. Specificity (fitness) scores 100 for an
//! equal type, 10 for an equal subtype and 1 per equal parameter, so
//! `text/html` beats `text/*` beats `*/*`.
//!
//! [`best_match`] ranks the server's types by quality, then fitness. Ties go
//! to whichever type the server listed first, which keeps responses stable
//! for clients with no strong preference.

use std::cmp::Ordering;

/// One entry of an `Accept` (or `Content-Type`) header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub kind: String,
    pub subtype: String,
    pub params: Vec<(String, String)>,
    pub quality: f32,
}

impl MediaRange {
    /// Parses `type/subtype;key=value;q=0.5`.
    ///
    /// Never fails: a bare `*` means `*/*`, a missing subtype is left empty,
    /// and a missing or malformed `q` (or one outside `0..=1`) counts as 1.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(';');
        let full_type = parts.next().unwrap_or("").trim();
        let full_type = if full_type == "*" { "*/*" } else { full_type };

        let (kind, subtype) = match full_type.split_once('/') {
            Some((k, st)) => (k.trim(), st.trim()),
            None => (full_type, ""),
        };

        let mut params = Vec::new();
        let mut quality = 1.0;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else { continue };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"');
            if key == "q" {
                quality = match value.parse::<f32>() {
                    Ok(q) if (0.0..=1.0).contains(&q) => q,
                    _ => 1.0,
                };
            } else {
                params.push((key, value.to_owned()));
            }
        }

        Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params,
            quality,
        }
    }

    /// True when either side's wildcards let `self` cover `other`.
    fn covers(&self, other: &Self) -> bool {
        let kind = self.kind == other.kind || self.kind == "*" || other.kind == "*";
        let subtype = self.subtype == other.subtype || self.subtype == "*" || other.subtype == "*";
        kind && subtype
    }
}

/// Splits a header into media ranges, skipping blank entries.
pub fn parse_header(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(MediaRange::parse)
        .collect()
}

/// Quality and fitness of `target` against the most specific matching range.
///
/// Returns `None` when no range covers `target`.
pub fn fitness_and_quality(target: &MediaRange, ranges: &[MediaRange]) -> Option<(f32, i32)> {
    let mut best: Option<(f32, i32)> = None;
    for range in ranges.iter().filter(|r| r.covers(target)) {
        let param_matches = target
            .params
            .iter()
            .filter(|(k, v)| range.params.iter().any(|(rk, rv)| rk == k && rv == v))
            .count() as i32;
        let fitness = if range.kind == target.kind { 100 } else { 0 }
            + if range.subtype == target.subtype { 10 } else { 0 }
            + param_matches;
        if best.is_none_or(|(_, f)| fitness > f) {
            best = Some((range.quality, fitness));
        }
    }
    best
}

/// The quality `header` assigns to `mime_type`; 0 when it is not accepted.
pub fn quality(mime_type: &str, header: &str) -> f32 {
    fitness_and_quality(&MediaRange::parse(mime_type), &parse_header(header))
        .map_or(0.0, |(q, _)| q)
}

/// Picks the entry of `supported` the client prefers.
///
/// ```
/// use restish::accept::best_match;
///
/// let supported = ["text/html", "application/json"];
/// assert_eq!(best_match(&supported, "application/json, */*;q=0.5"), Some("application/json"));
/// assert_eq!(best_match(&supported, "*/*"), Some("text/html"));
/// assert_eq!(best_match(&supported, "image/png"), None);
/// ```
pub fn best_match<'a, S: AsRef<str>>(supported: &'a [S], header: &str) -> Option<&'a str> {
    let ranges = parse_header(header);
    let mut best: Option<(f32, i32, &'a str)> = None;

    for candidate in supported {
        let candidate = candidate.as_ref();
        let Some((q, fitness)) = fitness_and_quality(&MediaRange::parse(candidate), &ranges) else {
            continue;
        };
        if q <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_q, best_fitness, _)) => match q.partial_cmp(&best_q) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => fitness > best_fitness,
                _ => false,
            },
        };
        if better {
            best = Some((q, fitness, candidate));
        }
    }

    best.map(|(_, _, candidate)| candidate)
}
