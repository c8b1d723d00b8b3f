// src/extract/body.rs
// =============================================================================
// The last-resort strategy. It cannot fail and has no length gate, which
// guarantees the pipeline always ends with some content.
//
// Note: html5ever invents a <body> for every document it parses, so we
// ask lol_html whether the raw markup has a real <body> start tag before
// trusting the parsed tree. Its tokenizer skips comments and script text.
// =============================================================================

use super::Fragment;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use scraper::{Html, Selector};
use std::cell::Cell;
use tracing::{debug, warn};

const NAME: &str = "body";

// Returns the page's <body> element, or the raw markup unchanged when the
// page has no body element.
pub fn body_fallback(html: &str) -> Fragment {
    if !has_body_tag(html) {
        warn!("body element not found, using the full markup");
        return Fragment::markup(NAME, html);
    }

    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(|b| b.html()));

    match body {
        Some(body) => {
            debug!("using body fallback");
            Fragment::markup(NAME, body)
        }
        None => Fragment::markup(NAME, html),
    }
}

fn has_body_tag(html: &str) -> bool {
    let found = Cell::new(false);

    let scanned = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("body", |_el| {
                found.set(true);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    );

    if let Err(e) = scanned {
        debug!(error = %e, "could not tokenize markup while looking for <body>");
        return false;
    }

    found.get()
}
