// src/fetch/mod.rs
// =============================================================================
// This module retrieves raw markup for a URL.
//
// Submodules:
// - http: plain HTTP GET with reqwest (fast, no JavaScript)
// - render: headless Chromium via chromiumoxide (slow, runs JavaScript)
//
// The crawl engine only sees the PageFetcher trait, so it does not care
// which transport is bound.
//
// Politeness:
// - RequestDelay sleeps a random amount of time before every request
//
// Rust concepts:
// - async_trait: async methods in traits, usable as Box<dyn PageFetcher>
// - Default trait methods: shutdown() is a no-op unless overridden
// =============================================================================

mod http;
mod render;

use crate::error::{CrawlError, FetchError};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub use http::SimpleFetcher;
pub use render::RenderingFetcher;

/// Anything that can turn a URL into markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page's markup, or an error for network failures and
    /// non-2xx responses.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;

    /// Releases transport resources (e.g. a browser process).
    async fn shutdown(&mut self) -> Result<(), FetchError> {
        Ok(())
    }
}

/// Which PageFetcher implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherKind {
    Simple,
    Rendering,
}

// Builds the configured fetcher.
//
// Launching a browser can fail (Chromium not installed), so this returns
// Result even though the plain HTTP client rarely does.
pub async fn build_fetcher(
    kind: FetcherKind,
    timeout: Duration,
) -> Result<Box<dyn PageFetcher>, FetchError> {
    match kind {
        FetcherKind::Simple => Ok(Box::new(SimpleFetcher::new(timeout)?)),
        FetcherKind::Rendering => Ok(Box::new(RenderingFetcher::launch(timeout).await?)),
    }
}

/// A delay window; every request waits a uniformly random time inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDelay {
    min: Duration,
    max: Duration,
}

impl RequestDelay {
    pub fn new(min: Duration, max: Duration) -> Result<Self, CrawlError> {
        if min > max {
            return Err(CrawlError::InvalidInput(format!(
                "minimum delay ({:.2}s) is larger than maximum delay ({:.2}s)",
                min.as_secs_f64(),
                max.as_secs_f64()
            )));
        }
        Ok(Self { min, max })
    }

    /// No waiting at all (tests, local mirrors).
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub async fn wait(&self) {
        let delay = self.sample();
        if delay.is_zero() {
            return;
        }
        debug!("waiting {:.2} seconds before request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

impl Default for RequestDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}
