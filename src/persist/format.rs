// src/persist/format.rs
// =============================================================================
// Turns an extracted fragment into Markdown.
//
// Markup fragments go through two steps:
// 1. lol_html rewrites relative href/src attributes into absolute URLs, so
//    links keep working once the page lives on disk
// 2. html2md converts the HTML to Markdown
//
// Text fragments are already rendered and pass through unchanged.
// =============================================================================

use crate::error::PersistError;
use crate::extract::{Fragment, FragmentKind};
use lol_html::{element, rewrite_str, RewriteStrSettings};
use url::Url;

/// Renders a content fragment into the output document format.
pub trait Formatter: Send + Sync {
    fn render(&self, fragment: &Fragment, base_url: &Url) -> Result<String, PersistError>;
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn render(&self, fragment: &Fragment, base_url: &Url) -> Result<String, PersistError> {
        match fragment.kind {
            FragmentKind::Text => Ok(fragment.content.clone()),
            FragmentKind::Markup => {
                let html = absolutize_links(&fragment.content, base_url).map_err(|message| {
                    PersistError::Render {
                        url: base_url.to_string(),
                        message,
                    }
                })?;
                Ok(tidy(&html2md::parse_html(&html)))
            }
        }
    }
}

// Rewrites <a href> and <img src> so they no longer depend on the page URL.
// In-page anchors (#section) are left alone.
fn absolutize_links(html: &str, base: &Url) -> Result<String, String> {
    let resolve = |value: &str| -> Option<String> {
        if value.starts_with('#') {
            return None;
        }
        base.join(value).ok().map(|u| u.to_string())
    };

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("a[href]", |el| {
                    if let Some(absolute) = el.get_attribute("href").and_then(|v| resolve(&v)) {
                        el.set_attribute("href", &absolute)?;
                    }
                    Ok(())
                }),
                element!("img[src]", |el| {
                    if let Some(absolute) = el.get_attribute("src").and_then(|v| resolve(&v)) {
                        el.set_attribute("src", &absolute)?;
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| e.to_string())
}

// Trims trailing spaces and squeezes runs of blank lines down to one.
fn tidy(markdown: &str) -> String {
    let mut result = String::with_capacity(markdown.len());
    let mut blank_run = 0;

    for line in markdown.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line);
        result.push('\n');
    }

    let trimmed = result.trim_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_markup_is_converted() {
        let fragment = Fragment::markup("x", "<h1>Heading</h1><p>Paragraph</p>");
        let markdown = MarkdownFormatter.render(&fragment, &page()).unwrap();
        assert!(markdown.contains("Heading"));
        assert!(markdown.contains("Paragraph"));
        assert!(!markdown.contains("<p>"));
    }

    #[test]
    fn test_text_passes_through_unchanged() {
        let fragment = Fragment::text("article", "Already rendered *text*\n\nwith two blocks");
        let rendered = MarkdownFormatter.render(&fragment, &page()).unwrap();
        assert_eq!(rendered, fragment.content);
    }

    #[test]
    fn test_relative_links_become_absolute() {
        let html = r##"<p><a href="../guide">Guide</a> <a href="#top">Top</a> <img src="img/a.png"></p>"##;
        let rewritten = absolutize_links(html, &page()).unwrap();
        assert!(rewritten.contains(r#"href="https://example.com/guide""#));
        assert!(rewritten.contains(r##"href="#top""##));
        assert!(rewritten.contains(r#"src="https://example.com/docs/img/a.png""#));
    }

    #[test]
    fn test_tidy_collapses_blank_lines() {
        assert_eq!(tidy("a  \n\n\n\nb\n\n"), "a\n\nb\n");
        assert_eq!(tidy("\n\n"), "");
    }
}
