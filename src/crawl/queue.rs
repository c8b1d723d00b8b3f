// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl itself, breadth-first.
//
// How it works:
// 1. Start with the base URL in a queue at depth 0
// 2. Pop the front entry; skip it if we have already visited it
// 3. Wait a random politeness delay, then fetch the page
// 4. Save the page as Markdown (if an output directory is configured)
// 5. Extract links; if this page is not at the depth limit, queue every
//    unvisited link that lives under the base URL's directory
// 6. Repeat until the queue is empty (or the user presses Ctrl-C)
//
// Depth comes from the shape of the URL path, not from how many clicks it
// took to reach a page:
//   base /docs/ -> /docs/a is depth 1, /docs/a/b is depth 2
//
// A failure on one page (network error, unwritable file) only affects that
// page. Nothing inside the loop can abort the crawl.
//
// Rust concepts:
// - VecDeque: FIFO queue, which is what makes the crawl breadth-first
// - HashSet: visited URLs, O(1) membership tests
// - tokio::select!: race the fetch against cancellation
// =============================================================================

use super::links::extract_links;
use super::observer::CrawlObserver;
use crate::error::{CrawlError, FetchError};
use crate::fetch::{PageFetcher, RequestDelay};
use crate::persist::{PersistOutcome, Persister};
use crate::scope::{depth, in_scope, normalize};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tokio_util::sync::CancellationToken;
use url::Url;

/// How far below the base URL the crawl may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxDepth {
    Unlimited,
    Limited(usize),
}

impl MaxDepth {
    // Parses the CLI convention: -1 = unlimited, 0 = base page only, N = levels
    pub fn from_arg(depth: i64) -> Result<Self, CrawlError> {
        match depth {
            -1 => Ok(MaxDepth::Unlimited),
            d if d >= 0 => Ok(MaxDepth::Limited(d as usize)),
            d => Err(CrawlError::InvalidInput(format!(
                "depth must be -1 (unlimited) or an integer >= 0, got {}",
                d
            ))),
        }
    }

    pub fn as_arg(&self) -> i64 {
        match self {
            MaxDepth::Unlimited => -1,
            MaxDepth::Limited(d) => *d as i64,
        }
    }

    // True when a page at `depth` may not expand its children.
    fn reached(&self, depth: usize) -> bool {
        matches!(self, MaxDepth::Limited(max) if depth >= *max)
    }

    // True when a link at `depth` may enter the queue.
    fn allows(&self, depth: usize) -> bool {
        match self {
            MaxDepth::Unlimited => true,
            MaxDepth::Limited(max) => depth <= *max,
        }
    }
}

impl Serialize for MaxDepth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_arg())
    }
}

// Represents a page in the crawl queue
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrontierEntry {
    url: Url,
    depth: usize, // computed once, when the link is discovered
}

/// Per-crawl counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub saved: usize,
    pub skipped: usize,
    pub persist_failed: usize,
    pub fetch_failed: usize,
}

/// Result of a crawl: every visited URL in visit order.
///
/// `interrupted` is true when the crawl was cancelled; `visited` then holds
/// everything reached so far.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub visited: Vec<Url>,
    pub interrupted: bool,
    pub stats: CrawlStats,
}

/// The breadth-first crawl engine.
pub struct Crawler<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    persister: Option<&'a Persister>,
    observer: &'a dyn CrawlObserver,
    max_depth: MaxDepth,
    delay: RequestDelay,
}

impl<'a, F: PageFetcher + ?Sized> Crawler<'a, F> {
    pub fn new(fetcher: &'a F, observer: &'a dyn CrawlObserver) -> Self {
        Self {
            fetcher,
            persister: None,
            observer,
            max_depth: MaxDepth::Limited(0),
            delay: RequestDelay::default(),
        }
    }

    pub fn max_depth(mut self, max_depth: MaxDepth) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn delay(mut self, delay: RequestDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Enables saving every fetched page.
    pub fn persist_with(mut self, persister: &'a Persister) -> Self {
        self.persister = Some(persister);
        self
    }

    // Crawls everything under `base_url` and returns the visited URLs.
    //
    // Parameters:
    //   base_url: where to start; also defines the scope of the crawl
    //   cancel: stops the crawl between (or during) page fetches
    pub async fn crawl(&self, base_url: &Url, cancel: &CancellationToken) -> CrawlOutcome {
        let base = normalize(base_url);

        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierEntry {
            url: base.clone(),
            depth: 0,
        });

        let mut visited = HashSet::new();
        let mut outcome = CrawlOutcome::default();

        while let Some(entry) = frontier.pop_front() {
            if cancel.is_cancelled() {
                outcome.interrupted = true;
                break;
            }

            // Skip if already visited
            if !visited.insert(entry.url.clone()) {
                continue;
            }
            outcome.visited.push(entry.url.clone());
            self.observer.on_visit(&entry.url, entry.depth);

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    outcome.interrupted = true;
                    break;
                }
                result = self.fetch_paced(&entry.url) => result,
            };

            let html = match fetched {
                Ok(html) => html,
                Err(e) => {
                    // No markup, no links: the crawl just moves on
                    outcome.stats.fetch_failed += 1;
                    self.observer.on_fetch_failed(&entry.url, &e);
                    continue;
                }
            };

            if let Some(persister) = self.persister {
                self.save(persister, &entry.url, &html, &mut outcome.stats);
            }

            let links = extract_links(&html, &entry.url);
            self.observer.on_links_discovered(&entry.url, &links);

            // The page itself was fetched and saved; the limit only stops
            // its children from being queued
            if self.max_depth.reached(entry.depth) {
                continue;
            }

            for link in links {
                if visited.contains(&link) || !in_scope(&base, &link) {
                    continue;
                }

                let link_depth = depth(&base, &link);
                if self.max_depth.allows(link_depth) {
                    frontier.push_back(FrontierEntry {
                        url: link,
                        depth: link_depth,
                    });
                }
            }
        }

        self.observer.on_finished(&outcome);
        outcome
    }

    async fn fetch_paced(&self, url: &Url) -> Result<String, FetchError> {
        self.delay.wait().await;
        self.fetcher.fetch(url).await
    }

    fn save(&self, persister: &Persister, url: &Url, html: &str, stats: &mut CrawlStats) {
        match persister.persist(url, html) {
            Ok(outcome) => {
                match outcome {
                    PersistOutcome::Written(_) => stats.saved += 1,
                    PersistOutcome::SkippedExisting(_) => stats.skipped += 1,
                }
                self.observer.on_persisted(url, &outcome);
            }
            Err(e) => {
                stats.persist_failed += 1;
                self.observer.on_persist_failed(url, &e);
            }
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is the visited check on dequeue and not only on enqueue?
//    - The same URL can be queued twice before either copy is processed
//      (two pages at depth 1 both link to it)
//    - Checking again when popping guarantees each URL is fetched at most
//      once; the first copy in the queue wins, including its depth
//
// 2. Why does depth 0 still fetch the base page?
//    - The limit gates expansion, not visitation: the last layer is fetched
//      and saved, but its links are never queued
//
// 3. What does `biased;` do in select!?
//    - Branches are polled top to bottom instead of randomly, so a pending
//      cancellation always wins over a fetch that happens to be ready
// -----------------------------------------------------------------------------
