// src/extract/article.rs
// =============================================================================
// Article-text strategy.
//
// Collects the prose paragraphs of a page (enough words, few links, not
// inside navigation chrome) and joins them into plain text. The result is
// already in its final rendered form, so the formatter passes it through
// untouched.
// =============================================================================

use super::{parse_selector, plain_text_len, ContentStrategy, Fragment};
use crate::error::ExtractError;
use scraper::{ElementRef, Html};
use url::Url;

const NAME: &str = "article";

const MIN_WORDS: usize = 8;
const MAX_LINK_SHARE: f64 = 0.5;

pub struct ArticleStrategy;

impl ContentStrategy for ArticleStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, html: &str, _page_url: &Url) -> Result<Option<Fragment>, ExtractError> {
        let document = Html::parse_document(html);
        let paragraphs = parse_selector(NAME, "p")?;
        let anchors = parse_selector(NAME, "a")?;

        let mut blocks = Vec::new();
        for paragraph in document.select(&paragraphs) {
            if inside_chrome(&paragraph) {
                continue;
            }

            let text = paragraph
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if text.split(' ').count() < MIN_WORDS {
                continue;
            }

            let total = plain_text_len(paragraph.text()).max(1);
            let linked: usize = paragraph
                .select(&anchors)
                .map(|a| plain_text_len(a.text()))
                .sum();
            if linked as f64 / total as f64 > MAX_LINK_SHARE {
                continue;
            }

            blocks.push(text);
        }

        if blocks.is_empty() {
            return Ok(None);
        }

        Ok(Some(Fragment::text(NAME, blocks.join("\n\n"))))
    }
}

// True when the element sits inside navigation, header, footer or aside.
fn inside_chrome(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "nav" | "header" | "footer" | "aside"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FragmentKind;

    fn page() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    #[test]
    fn test_collects_prose_as_text() {
        let html = r#"<html><body>
            <nav><p>Home About Contact Blog Careers Press Legal Privacy Terms</p></nav>
            <p>Rust is a language   empowering everyone to build reliable software.</p>
            <p>Short one.</p>
            <p>Its rich type system and ownership model guarantee memory safety.</p>
        </body></html>"#;

        let fragment = ArticleStrategy.extract(html, &page()).unwrap().unwrap();

        assert_eq!(fragment.kind, FragmentKind::Text);
        assert_eq!(
            fragment.content,
            "Rust is a language empowering everyone to build reliable software.\n\n\
             Its rich type system and ownership model guarantee memory safety."
        );
    }

    #[test]
    fn test_link_heavy_paragraphs_are_dropped() {
        let html = r#"<p><a href="/a">one two three four</a> <a href="/b">five six seven eight</a> nine</p>"#;
        assert_eq!(ArticleStrategy.extract(html, &page()).unwrap(), None);
    }

    #[test]
    fn test_empty_page_has_no_result() {
        assert_eq!(ArticleStrategy.extract("<html></html>", &page()).unwrap(), None);
    }
}
