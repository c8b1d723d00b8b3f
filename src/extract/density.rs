// src/extract/density.rs
// =============================================================================
// Text-density content scorer.
//
// How it works:
// 1. Every <p> or <pre> with a reasonable amount of text awards points to
//    its parent (full score) and grandparent (half score)
// 2. Each scored container is penalised by its link density (navigation
//    blocks are mostly link text) and by boilerplate-looking class/id
//    names such as "footer" or "sidebar"
// 3. The container with the best score wins
//
// Ties go to the container that appears first in the document.
// =============================================================================

use super::{parse_selector, plain_text_len, ContentStrategy, Fragment};
use crate::error::ExtractError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

const NAME: &str = "density";

// Paragraphs shorter than this are usually captions, buttons or bylines.
const MIN_PARAGRAPH_CHARS: usize = 25;

const BOILERPLATE_HINTS: [&str; 9] = [
    "nav", "footer", "sidebar", "comment", "menu", "header", "banner", "advert", "related",
];

const CONTENT_HINTS: [&str; 5] = ["content", "article", "post", "main", "body"];

pub struct DensityStrategy;

impl ContentStrategy for DensityStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, html: &str, _page_url: &Url) -> Result<Option<Fragment>, ExtractError> {
        let document = Html::parse_document(html);
        let paragraphs = parse_selector(NAME, "p, pre")?;
        let anchors = parse_selector(NAME, "a")?;

        // Scores in document order, with an index for quick lookups
        let mut scored = Vec::new();
        let mut index = HashMap::new();

        for paragraph in document.select(&paragraphs) {
            let length = plain_text_len(paragraph.text());
            if length < MIN_PARAGRAPH_CHARS {
                continue;
            }

            let commas = paragraph.text().map(|t| t.matches(',').count()).sum::<usize>();
            let points = 1.0 + commas as f64 + (length as f64 / 100.0).min(3.0);

            let mut weight = 1.0;
            for ancestor in paragraph.ancestors().filter_map(ElementRef::wrap).take(2) {
                let slot = *index.entry(ancestor.id()).or_insert_with(|| {
                    scored.push((ancestor, 0.0));
                    scored.len() - 1
                });
                scored[slot].1 += points * weight;
                weight /= 2.0;
            }
        }

        let mut best: Option<(ElementRef, f64)> = None;
        for (element, score) in scored {
            let adjusted = score * (1.0 - link_density(&element, &anchors)) * class_weight(&element);
            if best.as_ref().map_or(true, |(_, top)| adjusted > *top) {
                best = Some((element, adjusted));
            }
        }

        match best {
            Some((element, score)) if score > 0.0 => {
                debug!(
                    element = element.value().name(),
                    score,
                    "densest content block found"
                );
                Ok(Some(Fragment::markup(NAME, element.html())))
            }
            _ => Ok(None),
        }
    }
}

// Share of the element's text that sits inside links (0.0 - 1.0).
fn link_density(element: &ElementRef, anchors: &Selector) -> f64 {
    let total = plain_text_len(element.text());
    if total == 0 {
        return 1.0;
    }
    let linked: usize = element.select(anchors).map(|a| plain_text_len(a.text())).sum();
    (linked as f64 / total as f64).min(1.0)
}

// Multiplier derived from the element's tag, class and id.
fn class_weight(element: &ElementRef) -> f64 {
    let value = element.value();
    if matches!(value.name(), "nav" | "footer" | "aside" | "header") {
        return 0.2;
    }

    let hints = format!(
        "{} {}",
        value.attr("class").unwrap_or(""),
        value.attr("id").unwrap_or("")
    )
    .to_lowercase();

    if BOILERPLATE_HINTS.iter().any(|hint| hints.contains(hint)) {
        0.2
    } else if CONTENT_HINTS.iter().any(|hint| hints.contains(hint)) {
        1.5
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    #[test]
    fn test_prefers_prose_over_navigation() {
        let prose = "The quick brown fox jumps over the lazy dog, again and again, all day long.";
        let html = format!(
            r#"<html><body>
                <div class="sidebar"><p><a href="/a">A link that is long enough to count here</a></p></div>
                <div id="text"><p>{0}</p><p>{0}</p><p>{0}</p></div>
            </body></html>"#,
            prose
        );

        let fragment = DensityStrategy.extract(&html, &page()).unwrap().unwrap();

        assert!(fragment.content.starts_with(r#"<div id="text">"#));
        assert!(!fragment.content.contains("sidebar"));
    }

    #[test]
    fn test_no_paragraphs_means_no_result() {
        let html = "<html><body><div>just a div</div></body></html>";
        assert_eq!(DensityStrategy.extract(html, &page()).unwrap(), None);
    }

    #[test]
    fn test_link_only_block_scores_zero() {
        let html = r#"<html><body><div><p><a href="/x">Only a link with plenty of text in it</a></p></div></body></html>"#;
        assert_eq!(DensityStrategy.extract(html, &page()).unwrap(), None);
    }
}
