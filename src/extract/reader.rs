// src/extract/reader.rs
// =============================================================================
// Readability strategy, backed by the `readability` crate (a port of
// Mozilla's Readability heuristics, the same ones behind Firefox Reader
// View).
// =============================================================================

use super::{ContentStrategy, Fragment};
use crate::error::ExtractError;
use readability::extractor;
use url::Url;

const NAME: &str = "readability";

pub struct ReadabilityStrategy;

impl ContentStrategy for ReadabilityStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn extract(&self, html: &str, page_url: &Url) -> Result<Option<Fragment>, ExtractError> {
        let product = extractor::extract(&mut html.as_bytes(), page_url).map_err(|e| {
            ExtractError::Strategy {
                strategy: NAME,
                message: e.to_string(),
            }
        })?;

        if product.content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(Fragment::markup(NAME, product.content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MIN_CONTENT_CHARS;

    #[test]
    fn test_extracts_long_paragraph() {
        let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(5);
        let html = format!("<html><body><div><p>{}</p></div></body></html>", paragraph);
        let url = Url::parse("https://example.com/docs/").unwrap();

        let fragment = ReadabilityStrategy.extract(&html, &url).unwrap().unwrap();

        assert!(fragment.content.contains("Lorem ipsum"));
        assert!(fragment.text_len() >= MIN_CONTENT_CHARS);
    }
}
