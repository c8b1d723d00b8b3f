// src/extract/selector.rs
// =============================================================================
// Main-content selector matcher.
//
// Most documentation generators wrap the interesting part of a page in an
// element with a predictable name (<main>, <article>, #content, ...). We
// try those selectors in priority order and take the first element that
// holds enough text.
// =============================================================================

use super::{parse_selector, plain_text_len, ContentStrategy, Fragment, MIN_CONTENT_CHARS};
use crate::error::ExtractError;
use scraper::Html;
use tracing::debug;
use url::Url;

const NAME: &str = "selector";

// Highest priority first.
const MAIN_CONTENT_SELECTORS: [&str; 15] = [
    "main",
    "article",
    "[role=\"main\"]",
    "#main",
    ".main",
    "#content",
    ".content",
    "#contents",
    ".contents",
    "#main-content",
    ".main-content",
    "#mainContent",
    ".mainContent",
    ".post-content",
    ".article-content",
];

pub struct SelectorStrategy;

impl ContentStrategy for SelectorStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, html: &str, _page_url: &Url) -> Result<Option<Fragment>, ExtractError> {
        let document = Html::parse_document(html);

        for css in MAIN_CONTENT_SELECTORS {
            let selector = parse_selector(NAME, css)?;

            // Only the first match of each selector is considered
            if let Some(element) = document.select(&selector).next() {
                let length = plain_text_len(element.text());
                if length >= MIN_CONTENT_CHARS {
                    debug!(selector = css, length, "main-content element found");
                    return Ok(Some(Fragment::markup(NAME, element.html())));
                }
            }
        }

        debug!("no suitable main-content element");
        Ok(None)
    }
}
