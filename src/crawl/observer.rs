// src/crawl/observer.rs
// =============================================================================
// Crawl events.
//
// The engine does not print or log on its own; it reports what happens to
// a CrawlObserver handed to it by the caller. The console observer below is
// what the CLI uses: visited URLs go to stdout (one per line, in visit
// order) and everything else goes to the tracing log on stderr.
// =============================================================================

use super::queue::CrawlOutcome;
use crate::error::{FetchError, PersistError};
use crate::persist::PersistOutcome;
use tracing::{debug, info, warn};
use url::Url;

/// Receives crawl events. Every method has an empty default, so observers
/// only implement what they care about.
pub trait CrawlObserver: Send + Sync {
    /// A URL was dequeued for the first time and is about to be fetched.
    fn on_visit(&self, _url: &Url, _depth: usize) {}

    /// Links found on a fetched page, before scope and depth filtering.
    fn on_links_discovered(&self, _url: &Url, _links: &[Url]) {}

    fn on_fetch_failed(&self, _url: &Url, _error: &FetchError) {}

    fn on_persisted(&self, _url: &Url, _outcome: &PersistOutcome) {}

    fn on_persist_failed(&self, _url: &Url, _error: &PersistError) {}

    fn on_finished(&self, _outcome: &CrawlOutcome) {}
}

/// Prints visited URLs to stdout and logs everything else.
pub struct ConsoleObserver {
    print_urls: bool,
}

impl ConsoleObserver {
    /// `print_urls` is false in --json mode, where stdout carries the report.
    pub fn new(print_urls: bool) -> Self {
        Self { print_urls }
    }
}

impl CrawlObserver for ConsoleObserver {
    fn on_visit(&self, url: &Url, depth: usize) {
        debug!(url = %url, depth, "visiting");
        if self.print_urls {
            println!("{}", url);
        }
    }

    fn on_links_discovered(&self, url: &Url, links: &[Url]) {
        debug!(url = %url, count = links.len(), "links found");
    }

    fn on_fetch_failed(&self, url: &Url, error: &FetchError) {
        warn!(url = %url, "failed to fetch page: {}", error);
    }

    fn on_persisted(&self, url: &Url, outcome: &PersistOutcome) {
        match outcome {
            PersistOutcome::Written(path) => {
                debug!(url = %url, path = %path.display(), "saved");
            }
            PersistOutcome::SkippedExisting(path) => {
                debug!(url = %url, path = %path.display(), "skipped, file already exists");
            }
        }
    }

    fn on_persist_failed(&self, url: &Url, error: &PersistError) {
        warn!(url = %url, "failed to save markdown: {}", error);
    }

    fn on_finished(&self, outcome: &CrawlOutcome) {
        let stats = &outcome.stats;
        info!(
            visited = outcome.visited.len(),
            saved = stats.saved,
            skipped = stats.skipped,
            persist_failed = stats.persist_failed,
            fetch_failed = stats.fetch_failed,
            interrupted = outcome.interrupted,
            "crawl finished"
        );
    }
}
