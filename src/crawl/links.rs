// src/crawl/links.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// Every <a href> is resolved against the page URL (relative links become
// absolute), stripped of its #fragment, and kept only if it is http(s).
// Scope and depth filtering is the engine's job, not ours.
//
// Rust concepts:
// - Url::join: resolves relative links the same way a browser does
// - HashSet::insert returns false for duplicates, handy for dedup while
//   keeping document order
// =============================================================================

use crate::scope::normalize;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all crawlable links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links)
//
// Returns: normalized absolute URLs, in document order, without duplicates
//
// Example:
//   html = "<a href='page1#intro'>Docs</a>"
//   page_url = "https://example.com/docs/"
//   result = ["https://example.com/docs/page1"]
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = resolve_link(page_url, href) {
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}

// Resolves an href to a normalized absolute http(s) URL
//
// Examples:
//   base = "https://example.com/docs/page"
//   href = "/docs/other"        -> Some("https://example.com/docs/other")
//   href = "../about"           -> Some("https://example.com/about")
//   href = "#section"           -> Some("https://example.com/docs/page")
//   href = "mailto:a@b.c"       -> None (not HTTP)
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let joined = base.join(href.trim()).ok()?;

    if joined.scheme() != "http" && joined.scheme() != "https" {
        return None;
    }

    Some(normalize(&joined))
}
