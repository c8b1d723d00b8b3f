// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and validate them
// 2. Build the page fetcher (plain HTTP or headless browser)
// 3. Crawl the site, saving Markdown when --output is given
// 4. Exit with proper code (0 = finished, 1 = interrupted, 2 = error)
//
// Ctrl-C does not kill the process: it cancels the crawl, which then stops
// at the next safe point and reports what it visited so far.
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated settings
mod crawl; // src/crawl/ - the breadth-first crawl engine
mod error; // src/error.rs - error types
mod extract; // src/extract/ - main-content extraction strategies
mod fetch; // src/fetch/ - HTTP and browser page fetchers
mod persist; // src/persist/ - Markdown export
mod scope; // src/scope.rs - URL scope and depth rules

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{CrawlConfig, ReportFormat};
use crawl::{ConsoleObserver, CrawlOutcome, CrawlStats, Crawler, MaxDepth};
use persist::Persister;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected failure (e.g. the browser could not be launched)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished
//   Ok(1) = crawl interrupted by Ctrl-C
//   Ok(2) = invalid command-line input
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match CrawlConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(2);
        }
    };

    info!(
        url = %config.base_url,
        depth = config.max_depth.as_arg(),
        extractors = %config.extractors.names().join(","),
        "starting crawl"
    );

    let mut fetcher = fetch::build_fetcher(config.fetcher, config.timeout).await?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping crawl");
                cancel.cancel();
            }
        }
    });

    let persister = config
        .output
        .as_ref()
        .map(|root| Persister::new(root.clone(), config.overwrite, &config.extractors));
    let observer = ConsoleObserver::new(config.report == ReportFormat::Lines);

    let outcome = {
        let mut crawler = Crawler::new(fetcher.as_ref(), &observer)
            .max_depth(config.max_depth)
            .delay(config.delay);
        if let Some(persister) = &persister {
            crawler = crawler.persist_with(persister);
        }
        crawler.crawl(&config.base_url, &cancel).await
    };

    if let Err(e) = fetcher.shutdown().await {
        warn!("failed to shut down fetcher cleanly: {}", e);
    }

    if config.report == ReportFormat::Json {
        print_report(&config, &outcome)?;
    }

    if let Some(persister) = &persister {
        info!("pages saved under {}", persister.output_root().display());
    }

    Ok(if outcome.interrupted { 1 } else { 0 })
}

// Logs go to stderr so stdout only carries URLs (or the JSON report).
// RUST_LOG overrides the level picked from --verbose.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "page_harvest=debug,info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Summary printed by --json.
#[derive(Debug, Serialize)]
struct CrawlReport {
    base_url: String,
    max_depth: MaxDepth,
    output_dir: Option<PathBuf>,
    visited: Vec<String>,
    #[serde(flatten)]
    stats: CrawlStats,
    interrupted: bool,
}

impl CrawlReport {
    fn new(config: &CrawlConfig, outcome: &CrawlOutcome) -> Self {
        Self {
            base_url: config.base_url.to_string(),
            max_depth: config.max_depth,
            output_dir: config.output.clone(),
            visited: outcome.visited.iter().map(|u| u.to_string()).collect(),
            stats: outcome.stats.clone(),
            interrupted: outcome.interrupted,
        }
    }
}

fn print_report(config: &CrawlConfig, outcome: &CrawlOutcome) -> Result<()> {
    let json_output = serde_json::to_string_pretty(&CrawlReport::new(config, outcome))?;
    println!("{}", json_output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_report_shape() {
        let cli = Cli::try_parse_from(["page-harvest", "-d", "-1", "https://example.com/docs/"])
            .unwrap();
        let config = CrawlConfig::from_cli(&cli).unwrap();
        let outcome = CrawlOutcome {
            visited: vec![
                Url::parse("https://example.com/docs/").unwrap(),
                Url::parse("https://example.com/docs/a").unwrap(),
            ],
            interrupted: true,
            stats: CrawlStats {
                fetch_failed: 1,
                ..CrawlStats::default()
            },
        };

        let value = serde_json::to_value(CrawlReport::new(&config, &outcome)).unwrap();
        assert_eq!(value["base_url"], "https://example.com/docs/");
        assert_eq!(value["max_depth"], -1);
        assert_eq!(value["output_dir"], serde_json::Value::Null);
        assert_eq!(value["visited"][1], "https://example.com/docs/a");
        assert_eq!(value["fetch_failed"], 1);
        assert_eq!(value["interrupted"], true);
    }
}
