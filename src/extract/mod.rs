// src/extract/mod.rs
// =============================================================================
// This module finds the main content of a page.
//
// Real-world pages are wildly inconsistent, so no single algorithm works
// everywhere. Instead we run an ordered list of strategies over the same
// markup and keep the first result that carries enough text:
//
//   density -> readability -> article -> selector -> body (always last)
//
// Submodules:
// - density: scores block containers by the paragraph text they hold
// - reader: the Mozilla Readability port from the `readability` crate
// - article: collects prose paragraphs into already-rendered plain text
// - selector: well-known main-content CSS selectors
// - body: the unconditional fallback
//
// Rust concepts:
// - Trait objects: Box<dyn ContentStrategy> lets us keep different
//   strategies in one Vec
// - Result<Option<T>, E>: "failed", "found nothing" and "found something"
//   are three different outcomes and the type says so
// =============================================================================

mod article;
mod body;
mod density;
mod reader;
mod selector;

use crate::error::ExtractError;
use scraper::Selector;
use tracing::{debug, warn};
use url::Url;

pub use article::ArticleStrategy;
pub use body::body_fallback;
pub use density::DensityStrategy;
pub use reader::ReadabilityStrategy;
pub use selector::SelectorStrategy;

/// A fragment is only accepted when its plain text has at least this many
/// characters. The body fallback is the one exception.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Strategy names accepted by `--extractors`, in default order.
pub const STRATEGY_NAMES: [&str; 4] = ["density", "readability", "article", "selector"];

/// What a strategy produced: HTML markup, or text that is already in its
/// final rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Markup,
    Text,
}

/// A candidate piece of main content plus the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub content: String,
    pub kind: FragmentKind,
    pub strategy: &'static str,
}

impl Fragment {
    pub fn markup(strategy: &'static str, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: FragmentKind::Markup,
            strategy,
        }
    }

    pub fn text(strategy: &'static str, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: FragmentKind::Text,
            strategy,
        }
    }

    /// Number of visible characters, ignoring surrounding whitespace of
    /// every text node.
    pub fn text_len(&self) -> usize {
        match self.kind {
            FragmentKind::Text => self.content.trim().chars().count(),
            FragmentKind::Markup => {
                let fragment = scraper::Html::parse_fragment(&self.content);
                plain_text_len(fragment.root_element().text())
            }
        }
    }
}

/// One way of locating the main content of a page.
///
/// `Ok(None)` means "nothing suitable here"; `Err` means the strategy
/// itself broke. The pipeline treats both the same way and moves on.
pub trait ContentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, html: &str, page_url: &Url) -> Result<Option<Fragment>, ExtractError>;
}

/// Ordered list of strategy names. Built once from the command line and
/// only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    names: Vec<String>,
}

impl ExtractorConfig {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Names that are not in the strategy registry.
    pub fn unknown_names(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| strategy_by_name(name).is_none())
            .collect()
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new(STRATEGY_NAMES)
    }
}

// Looks a strategy up in the fixed registry. The older library-style
// names (trafilatura, newspaper3k/newspaper, xpath) are accepted as
// aliases so existing command lines keep working.
fn strategy_by_name(name: &str) -> Option<Box<dyn ContentStrategy>> {
    match name {
        "density" | "trafilatura" => Some(Box::new(DensityStrategy)),
        "readability" => Some(Box::new(ReadabilityStrategy)),
        "article" | "newspaper3k" | "newspaper" => Some(Box::new(ArticleStrategy)),
        "selector" | "xpath" => Some(Box::new(SelectorStrategy)),
        _ => None,
    }
}

/// The ordered strategy chain. The body fallback is not part of the list;
/// it always runs after it.
pub struct Pipeline {
    strategies: Vec<Box<dyn ContentStrategy>>,
}

impl Pipeline {
    /// Resolves the configured names. Unknown names are skipped with a
    /// warning rather than failing the whole pipeline.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let strategies = config
            .names()
            .iter()
            .filter_map(|name| {
                let strategy = strategy_by_name(name);
                if strategy.is_none() {
                    warn!(extractor = %name, "unknown extractor name, skipping");
                }
                strategy
            })
            .collect();

        Self { strategies }
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ContentStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Runs every strategy in order and returns the first fragment with at
    /// least MIN_CONTENT_CHARS characters of text. Never fails: when
    /// nothing qualifies the body fallback answers.
    pub fn extract(&self, html: &str, page_url: &Url) -> Fragment {
        for strategy in &self.strategies {
            match strategy.extract(html, page_url) {
                Ok(Some(fragment)) => {
                    let length = fragment.text_len();
                    if length >= MIN_CONTENT_CHARS {
                        debug!(strategy = strategy.name(), length, "content extracted");
                        return fragment;
                    }
                    debug!(strategy = strategy.name(), length, "extracted content too short");
                }
                Ok(None) => {
                    debug!(strategy = strategy.name(), "no content found");
                }
                Err(e) => {
                    debug!(strategy = strategy.name(), error = %e, "extraction failed");
                }
            }
        }

        debug!("all extractors failed, using body fallback");
        body_fallback(html)
    }
}

// Sum of the trimmed lengths of a run of text nodes.
pub(crate) fn plain_text_len<'a>(texts: impl Iterator<Item = &'a str>) -> usize {
    texts.map(|t| t.trim().chars().count()).sum()
}

// Parses a CSS selector, turning a parse failure into a strategy error.
pub(crate) fn parse_selector(strategy: &'static str, css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Strategy {
        strategy,
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // A strategy that returns a canned answer and records that it ran.
    struct Stub {
        name: &'static str,
        answer: Result<Option<Fragment>, ()>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ContentStrategy for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extract(&self, _html: &str, _page_url: &Url) -> Result<Option<Fragment>, ExtractError> {
            self.calls.lock().unwrap().push(self.name);
            self.answer.clone().map_err(|_| ExtractError::Strategy {
                strategy: self.name,
                message: "boom".to_string(),
            })
        }
    }

    fn stub(
        name: &'static str,
        answer: Result<Option<Fragment>, ()>,
        calls: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Box<dyn ContentStrategy> {
        Box::new(Stub {
            name,
            answer,
            calls: Arc::clone(calls),
        })
    }

    fn page() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_short_result_falls_through_to_next_strategy() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let short = Fragment::markup("a", "<p>too short</p>");
        let long = Fragment::markup("b", format!("<p>{}</p>", "b".repeat(150)));
        let pipeline = Pipeline::with_strategies(vec![
            stub("a", Ok(Some(short)), &calls),
            stub("b", Ok(Some(long.clone())), &calls),
        ]);

        let result = pipeline.extract("<html><body>raw</body></html>", &page());

        assert_eq!(result, long);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_accepted_result_stops_the_scan() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let long = Fragment::markup("a", format!("<p>{}</p>", "a".repeat(100)));
        let pipeline = Pipeline::with_strategies(vec![
            stub("a", Ok(Some(long.clone())), &calls),
            stub("b", Ok(Some(long.clone())), &calls),
        ]);

        assert_eq!(pipeline.extract("html", &page()).strategy, "a");
        assert_eq!(*calls.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_failing_strategy_is_treated_as_no_result() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let long = Fragment::text("b", "b".repeat(120));
        let pipeline = Pipeline::with_strategies(vec![
            stub("a", Err(()), &calls),
            stub("b", Ok(Some(long.clone())), &calls),
        ]);

        assert_eq!(pipeline.extract("html", &page()), long);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_everything_failing_returns_raw_markup() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::with_strategies(vec![
            stub("a", Ok(None), &calls),
            stub("b", Err(()), &calls),
            stub("c", Ok(Some(Fragment::markup("c", "<p>tiny</p>"))), &calls),
        ]);

        let result = pipeline.extract("html", &page());

        assert_eq!(result.content, "html");
        assert_eq!(result.strategy, "body");
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let config = ExtractorConfig::new(["invalid_extractor", "selector"]);
        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.strategy_names(), vec!["selector"]);
        assert_eq!(config.unknown_names(), vec!["invalid_extractor"]);
    }

    #[test]
    fn test_only_unknown_names_falls_back_to_raw_markup() {
        let config = ExtractorConfig::new(["invalid_extractor"]);
        let result = Pipeline::from_config(&config).extract("html", &page());
        assert_eq!(result.content, "html");
    }

    #[test]
    fn test_legacy_names_are_aliases() {
        let config = ExtractorConfig::new(["trafilatura", "newspaper3k", "newspaper", "xpath"]);
        assert!(config.unknown_names().is_empty());
        assert_eq!(
            Pipeline::from_config(&config).strategy_names(),
            vec!["density", "article", "article", "selector"]
        );
    }

    #[test]
    fn test_body_cannot_be_configured() {
        let config = ExtractorConfig::new(["body"]);
        assert_eq!(config.unknown_names(), vec!["body"]);
    }

    #[test]
    fn test_default_order() {
        let pipeline = Pipeline::from_config(&ExtractorConfig::default());
        assert_eq!(pipeline.strategy_names(), STRATEGY_NAMES.to_vec());
    }

    #[test]
    fn test_config_is_not_modified_by_the_pipeline() {
        let config = ExtractorConfig::new(["article"]);
        let before = config.clone();
        let pipeline = Pipeline::from_config(&config);
        let _ = pipeline.extract("<html><body><p>x</p></body></html>", &page());
        let _ = pipeline.extract("<html><body><p>y</p></body></html>", &page());
        assert_eq!(config, before);
    }

    #[test]
    fn test_text_len_ignores_tags_and_whitespace() {
        let fragment = Fragment::markup("x", "<div>\n  <p> abc </p>\n  <p>de</p>\n</div>");
        assert_eq!(fragment.text_len(), 5);

        let text = Fragment::text("x", "  hello  ");
        assert_eq!(text.text_len(), 5);
    }

    #[test]
    fn test_default_pipeline_finds_article_content() {
        let paragraph = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(5);
        let html = format!(
            "<html><body><nav><a href='/'>Home</a></nav><article><p>{}</p></article></body></html>",
            paragraph
        );
        let result = Pipeline::from_config(&ExtractorConfig::default()).extract(&html, &page());
        assert!(result.content.contains("Lorem ipsum"));
        assert!(result.text_len() >= MIN_CONTENT_CHARS);
    }
}
