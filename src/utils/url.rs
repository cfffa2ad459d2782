//! Request path normalization.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Split off the query string and percent-decode the path.
///
/// Invalid UTF-8 after decoding keeps the raw path.
pub fn decode_request_path(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    percent_decode_str(path)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_string())
}

/// Lexically clean a path: collapse `//`, drop `.`, resolve `..`.
///
/// The result is always rooted; `..` never climbs above `/`.
///
/// ```ignore
/// clean_path("static//css/./a.css") -> "/static/css/a.css"
/// clean_path("/a/b/../../../c")     -> "/c"
/// clean_path("")                    -> "/"
/// ```
pub fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Normalize a configured prefix: leading `/`, no trailing `/`.
///
/// Returns `None` for an empty or root-only prefix.
pub fn normalize_prefix(prefix: &str) -> Option<String> {
    let cleaned = clean_path(prefix);
    (cleaned != "/").then_some(cleaned)
}

/// Strip `prefix` from a cleaned path on a segment boundary.
///
/// Paths outside the prefix are returned unchanged.
///
/// ```ignore
/// strip_prefix("/assets/css/a.css", "/assets") -> "/css/a.css"
/// strip_prefix("/assets", "/assets")           -> "/"
/// strip_prefix("/assetsx/a.css", "/assets")    -> "/assetsx/a.css"
/// ```
pub fn strip_prefix(path: &str, prefix: &str) -> String {
    match path.strip_prefix(prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/static/css/a.css"), "/static/css/a.css");
        assert_eq!(clean_path("static//css/./a.css"), "/static/css/a.css");
        assert_eq!(clean_path("/a/b/../c/"), "/a/c");
        assert_eq!(clean_path("/a/b/../../../c"), "/c");
        assert_eq!(clean_path("/../.."), "/");
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("/"), "/");
    }

    #[test]
    fn test_decode_request_path() {
        assert_eq!(decode_request_path("/css/a.css?v=3"), "/css/a.css");
        assert_eq!(decode_request_path("/my%20file.js"), "/my file.js");
        assert_eq!(decode_request_path("/a.js#frag"), "/a.js");
        assert_eq!(decode_request_path("/bad%ff.css"), "/bad%ff.css");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("assets").as_deref(), Some("/assets"));
        assert_eq!(normalize_prefix("/assets/").as_deref(), Some("/assets"));
        assert_eq!(normalize_prefix("mwanza").as_deref(), Some("/mwanza"));
        assert_eq!(normalize_prefix("/"), None);
        assert_eq!(normalize_prefix(""), None);
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("/assets/css/a.css", "/assets"), "/css/a.css");
        assert_eq!(strip_prefix("/assets", "/assets"), "/");
        assert_eq!(strip_prefix("/assetsx/a.css", "/assets"), "/assetsx/a.css");
        assert_eq!(strip_prefix("/other/a.css", "/assets"), "/other/a.css");
    }
}
