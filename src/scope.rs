// src/scope.rs
// =============================================================================
// URL scope arithmetic.
//
// A crawl is confined to the "directory" of its base URL:
//   base https://example.com/docs/intro.html -> scope /docs/
//   base https://example.com/docs/           -> scope /docs/
//   base https://example.com                 -> scope /
//
// Everything here is a pure function of its inputs, which keeps the crawl
// engine easy to test.
//
// Rust concepts:
// - Borrowing: all functions take &Url and never clone unless they return
// - str::strip_prefix / get: safe slicing that returns Option
// =============================================================================

use url::Url;

// Removes the #fragment and keeps scheme, host, path and query untouched.
//
// Example:
//   https://example.com/path/?a=1#b -> https://example.com/path/?a=1
pub fn normalize(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

// Returns the directory part of a URL's path, always ending in '/'.
//
// Examples:
//   /docs/           -> /docs/
//   /docs/page.html  -> /docs/
//   /page.html       -> /
//   /                -> /
pub fn scope_directory(url: &Url) -> String {
    let path = url.path();

    if path.ends_with('/') {
        return path.to_string();
    }

    match path.rfind('/') {
        Some(idx) if idx > 0 => format!("{}/", &path[..idx]),
        _ => "/".to_string(),
    }
}

// Checks whether `candidate` lives under the scope of `base`.
//
// The host (and port) must match exactly, and the candidate's path must
// start with the base's scope directory. The directory always ends with
// '/', so /doc/ never admits /doc2/x.
pub fn in_scope(base: &Url, candidate: &Url) -> bool {
    if base.host_str() != candidate.host_str() || base.port() != candidate.port() {
        return false;
    }

    candidate.path().starts_with(&scope_directory(base))
}

// Depth of `candidate` below the scope directory of `base`, measured purely
// from the shape of the path:
//   /docs/                   -> 0
//   /docs/page.html          -> 1
//   /docs/section/page.html  -> 2
//   /docs/section/           -> 1
pub fn depth(base: &Url, candidate: &Url) -> usize {
    let scope = scope_directory(base);
    let relative = candidate.path().get(scope.len()..).unwrap_or("");

    if relative.is_empty() || relative == "/" {
        return 0;
    }

    let trimmed = relative.trim_end_matches('/');
    if trimmed.is_empty() {
        0
    } else {
        trimmed.matches('/').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_strips_fragment() {
        let u = url("https://example.com/path/index.html#section");
        assert_eq!(normalize(&u).as_str(), "https://example.com/path/index.html");
    }

    #[test]
    fn test_normalize_keeps_query() {
        let u = url("https://example.com/path/?a=1#b");
        assert_eq!(normalize(&u).as_str(), "https://example.com/path/?a=1");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let u = url("https://example.com/a/b?x=1&y=2#frag");
        let once = normalize(&u);
        assert_eq!(normalize(&once), once);
        assert_eq!(once.fragment(), None);
    }

    #[test]
    fn test_normalize_without_fragment_is_unchanged() {
        let u = url("https://example.com/docs/page?q=1");
        assert_eq!(normalize(&u), u);
    }

    #[test]
    fn test_scope_directory() {
        assert_eq!(scope_directory(&url("https://example.com/docs/")), "/docs/");
        assert_eq!(scope_directory(&url("https://example.com/docs/page.html")), "/docs/");
        assert_eq!(scope_directory(&url("https://example.com/")), "/");
        assert_eq!(scope_directory(&url("https://example.com/page.html")), "/");
        assert_eq!(scope_directory(&url("https://example.com/a/b/c")), "/a/b/");
    }

    #[test]
    fn test_in_scope() {
        let base = url("https://example.com/docs/");
        assert!(in_scope(&base, &url("https://example.com/docs/page.html")));
        assert!(in_scope(&base, &url("https://example.com/docs/section/page.html")));
        assert!(!in_scope(&base, &url("https://example.com/blog/page.html")));
        assert!(!in_scope(&base, &url("https://other.com/docs/page.html")));
    }

    #[test]
    fn test_other_host_is_never_in_scope() {
        let base = url("https://example.com/");
        assert!(!in_scope(&base, &url("https://sub.example.com/")));
        assert!(!in_scope(&base, &url("https://example.org/anything")));
        assert!(!in_scope(&base, &url("https://example.com:8443/")));
    }

    #[test]
    fn test_sibling_directory_with_shared_prefix_is_out_of_scope() {
        let base = url("https://example.com/doc/");
        assert!(!in_scope(&base, &url("https://example.com/doc2/x")));
        assert!(!in_scope(&base, &url("https://example.com/docs")));
        // The directory itself without its trailing slash is outside too.
        assert!(!in_scope(&base, &url("https://example.com/doc")));
    }

    #[test]
    fn test_page_base_scopes_to_its_directory() {
        let base = url("https://example.com/docs/intro.html");
        assert!(in_scope(&base, &url("https://example.com/docs/other.html")));
        assert!(!in_scope(&base, &url("https://example.com/intro.html")));
    }

    #[test]
    fn test_depth() {
        let base = url("https://example.com/docs/");
        assert_eq!(depth(&base, &url("https://example.com/docs/")), 0);
        assert_eq!(depth(&base, &url("https://example.com/docs/page.html")), 1);
        assert_eq!(depth(&base, &url("https://example.com/docs/section/page.html")), 2);
        assert_eq!(depth(&base, &url("https://example.com/docs/section/")), 1);
        assert_eq!(depth(&base, &url("https://example.com/docs/a/b/c/d")), 4);
    }

    #[test]
    fn test_depth_of_base_is_zero() {
        let base = url("https://example.com/docs/");
        assert_eq!(depth(&base, &base), 0);
    }

    #[test]
    fn test_depth_ignores_query() {
        let base = url("https://example.com/docs/");
        assert_eq!(depth(&base, &url("https://example.com/docs/page?id=a/b")), 1);
    }
}
