// src/config.rs
// =============================================================================
// Validated crawl configuration.
//
// Cli holds raw strings and numbers; CrawlConfig holds checked, typed
// values. Everything that can be wrong with the user's input is reported
// here, before a single request is made.
// =============================================================================

use crate::cli::Cli;
use crate::crawl::MaxDepth;
use crate::error::CrawlError;
use crate::extract::ExtractorConfig;
use crate::fetch::{FetcherKind, RequestDelay};
use crate::persist::OverwritePolicy;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One visited URL per line, as the crawl goes.
    Lines,
    /// A single JSON document once the crawl is over.
    Json,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub max_depth: MaxDepth,
    pub output: Option<PathBuf>,
    pub overwrite: OverwritePolicy,
    pub extractors: ExtractorConfig,
    pub delay: RequestDelay,
    pub timeout: Duration,
    pub fetcher: FetcherKind,
    pub report: ReportFormat,
}

impl CrawlConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, CrawlError> {
        let base_url = parse_base_url(&cli.url)?;
        let max_depth = MaxDepth::from_arg(cli.depth)?;

        let extractors = match &cli.extractors {
            Some(names) => {
                let config = ExtractorConfig::new(
                    names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()),
                );
                let unknown = config.unknown_names();
                if !unknown.is_empty() {
                    return Err(CrawlError::InvalidInput(format!(
                        "invalid extractor names: {} (valid: {}; body always runs last and cannot be listed)",
                        unknown.join(", "),
                        crate::extract::STRATEGY_NAMES.join(", ")
                    )));
                }
                config
            }
            None => ExtractorConfig::default(),
        };

        let delay = RequestDelay::new(
            seconds("--min-delay", cli.min_delay)?,
            seconds("--max-delay", cli.max_delay)?,
        )?;

        if cli.timeout == 0 {
            return Err(CrawlError::InvalidInput(
                "--timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            max_depth,
            output: cli.output.clone(),
            overwrite: if cli.skip_existing {
                OverwritePolicy::SkipExisting
            } else {
                OverwritePolicy::Overwrite
            },
            extractors,
            delay,
            timeout: Duration::from_secs(cli.timeout),
            fetcher: if cli.render {
                FetcherKind::Rendering
            } else {
                FetcherKind::Simple
            },
            report: if cli.json {
                ReportFormat::Json
            } else {
                ReportFormat::Lines
            },
        })
    }
}

// The base URL needs an http(s) scheme and a host.
fn parse_base_url(input: &str) -> Result<Url, CrawlError> {
    let invalid = || {
        CrawlError::InvalidInput(format!(
            "please provide a valid URL (e.g., https://example.com/docs/), got '{}'",
            input
        ))
    };

    let url = Url::parse(input).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }

    Ok(url)
}

fn seconds(flag: &str, value: f64) -> Result<Duration, CrawlError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| CrawlError::InvalidInput(format!("{} must be a non-negative number", flag)))
}
