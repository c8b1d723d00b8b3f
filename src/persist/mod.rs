// src/persist/mod.rs
// =============================================================================
// This module saves pages as Markdown files.
//
// Layout:
//   <output_root>/<host>/<url path>.md
//   https://example.com/docs/          -> output/example.com/docs.md
//   https://example.com/docs/page.html -> output/example.com/docs/page.html.md
//   https://example.com/               -> output/example.com/index.md
//
// Every file starts with a heading that links back to the source page:
//   # [Page Title](https://example.com/docs/page.html)
//
// Files are written to a temporary file in the same directory and then
// renamed into place, so a reader never sees half a document.
//
// Submodules:
// - format: the Formatter trait and the html2md-based Markdown formatter
// =============================================================================

mod format;

use crate::error::PersistError;
use crate::extract::{ExtractorConfig, Pipeline};
use scraper::{Html, Selector};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

pub use format::{Formatter, MarkdownFormatter};

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    #[default]
    Overwrite,
    SkipExisting,
}

/// What persist() did with a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written(PathBuf),
    SkippedExisting(PathBuf),
}

// Maps a URL to its output file.
//
// Distinct URLs can collide: /docs/ and /docs share docs.md, and the query
// string is ignored.
pub fn target_path(url: &Url, output_root: &Path) -> Result<PathBuf, PersistError> {
    let host = url.host_str().ok_or_else(|| PersistError::NoHost {
        url: url.to_string(),
    })?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let mut path = url.path().trim_matches('/').to_string();
    if path.is_empty() {
        path = "index".to_string();
    }
    if !path.ends_with(".md") {
        path.push_str(".md");
    }

    Ok(output_root.join(host).join(path))
}

// Title for the document heading: first <h1>, then <title>, then "Untitled".
pub fn page_title(html: &str) -> String {
    let document = Html::parse_document(html);

    for css in ["h1", "title"] {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let title = element.text().collect::<Vec<_>>().join(" ");
            let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
            if !title.is_empty() {
                debug!(source = css, title = %title, "page title extracted");
                return title;
            }
        }
    }

    warn!("page title not found, using 'Untitled'");
    "Untitled".to_string()
}

/// Extracts, renders and writes pages below one output directory.
pub struct Persister {
    output_root: PathBuf,
    policy: OverwritePolicy,
    pipeline: Pipeline,
    formatter: Box<dyn Formatter>,
}

impl Persister {
    pub fn new(output_root: PathBuf, policy: OverwritePolicy, extractors: &ExtractorConfig) -> Self {
        Self::with_parts(
            output_root,
            policy,
            Pipeline::from_config(extractors),
            Box::new(MarkdownFormatter),
        )
    }

    pub fn with_parts(
        output_root: PathBuf,
        policy: OverwritePolicy,
        pipeline: Pipeline,
        formatter: Box<dyn Formatter>,
    ) -> Self {
        Self {
            output_root,
            policy,
            pipeline,
            formatter,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Saves one page. Errors are returned to the caller, which logs them
    /// and carries on crawling.
    pub fn persist(&self, url: &Url, html: &str) -> Result<PersistOutcome, PersistError> {
        let path = target_path(url, &self.output_root)?;

        if self.policy == OverwritePolicy::SkipExisting && path.exists() {
            debug!(path = %path.display(), "skip (already exists)");
            return Ok(PersistOutcome::SkippedExisting(path));
        }

        let title = page_title(html);
        let fragment = self.pipeline.extract(html, url);
        let body = self.formatter.render(&fragment, url)?;
        let document = format!("# [{}]({})\n\n{}", title, url, body);

        write_atomically(&path, &document)?;
        debug!(path = %path.display(), strategy = fragment.strategy, "saved file");

        Ok(PersistOutcome::Written(path))
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), PersistError> {
    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError {
        let path = path.to_path_buf();
        move |source| PersistError::Io { path, source }
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(io_error(parent))?;

    let mut file = NamedTempFile::new_in(parent).map_err(io_error(parent))?;
    file.write_all(contents.as_bytes()).map_err(io_error(path))?;
    file.persist(path).map_err(|e| PersistError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}
