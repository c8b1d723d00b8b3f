// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a base URL
// - Stays inside the base URL's directory on the same host
// - Configurable depth limit (-1 = unlimited)
// - Polite crawling with a random delay before every request
// - Optional Markdown export of every visited page
// - Ctrl-C stops the crawl cleanly and still reports what was visited
//
// Submodules:
// - queue: the crawl engine (frontier, visited set, depth accounting)
// - links: extracts and normalizes <a href> targets
// - observer: crawl events (stdout + logging for the CLI)
// =============================================================================

mod links;
mod observer;
mod queue;

pub use observer::{ConsoleObserver, CrawlObserver};
pub use queue::{CrawlOutcome, CrawlStats, Crawler, MaxDepth};
