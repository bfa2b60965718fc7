//! Short MIME name expansion.
//!
//! Routes may declare `"html"` or `"json"` instead of a full type. Known short
//! names expand to their MIME type; unknown ones are kept verbatim so they can
//! still be matched and sent back as a `Content-Type`.

/// Expands a declared type to a full MIME type where one is known.
///
/// ```
/// use restish::mime::normalise;
/// assert_eq!(normalise("json"), "application/json");
/// assert_eq!(normalise("text/html"), "text/html");
/// assert_eq!(normalise("*"), "*/*");
/// assert_eq!(normalise("unknown"), "unknown");
/// ```
pub fn normalise(declared: &str) -> String {
    let declared = declared.trim();
    if declared.contains('/') {
        return declared.to_owned();
    }
    if declared == "*" {
        return "*/*".to_owned();
    }
    expand(&declared.to_ascii_lowercase())
        .map_or_else(|| declared.to_owned(), str::to_owned)
}

fn expand(short: &str) -> Option<&'static str> {
    let full = match short {
        // Text
        "html" | "htm" => "text/html",
        "txt" | "text" => "text/plain",
        "css" => "text/css",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Script / data
        "json" => "application/json",
        "js" => "application/javascript",
        "atom" => "application/atom+xml",
        "rss" => "application/rss+xml",
        "xhtml" => "application/xhtml+xml",
        "form" => "application/x-www-form-urlencoded",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "bin" => "application/octet-stream",

        _ => return None,
    };
    Some(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_short_names() {
        assert_eq!(normalise("html"), "text/html");
        assert_eq!(normalise("txt"), "text/plain");
        assert_eq!(normalise("xhtml"), "application/xhtml+xml");
        assert_eq!(normalise("PNG"), "image/png");
    }

    #[test]
    fn full_types_and_unknowns_pass_through() {
        assert_eq!(normalise("text/*"), "text/*");
        assert_eq!(normalise(" application/vnd.api+json "), "application/vnd.api+json");
        assert_eq!(normalise("unknown"), "unknown");
    }
}
