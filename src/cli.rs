// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below *is* the CLI, and clap
// generates the parser, --help and --version from it.
//
// The struct only captures what the user typed. Checking that the values
// make sense (valid URL, depth >= -1, known extractors) happens in
// config.rs.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "page-harvest",
    version,
    about = "Crawl the pages under a base URL and optionally save them as Markdown",
    long_about = "page-harvest walks every page below the directory of a base URL, breadth-first, \
                  and prints each URL it visits. With --output it also extracts the main content \
                  of every page and saves it as a Markdown file.",
    after_help = "Examples:\n  \
                  page-harvest https://example.com/docs/\n  \
                  page-harvest -d 1 -o saved_docs https://example.com/docs/\n  \
                  page-harvest -d 2 -o saved_docs -s -e density,readability -v https://example.com/docs/"
)]
pub struct Cli {
    /// Base URL to crawl (e.g., https://example.com/docs/)
    pub url: String,

    /// Maximum depth (0 = this page only, -1 = unlimited)
    #[arg(
        short,
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        value_name = "N"
    )]
    pub depth: i64,

    /// Save extracted pages as Markdown under DIR ("output" if DIR is omitted)
    #[arg(
        short,
        long,
        value_name = "DIR",
        num_args = 0..=1,
        default_missing_value = "output"
    )]
    pub output: Option<PathBuf>,

    /// Comma-separated extractors to try in order
    /// (density, readability, article, selector; trafilatura, newspaper3k
    /// and xpath are accepted as aliases). The body fallback always runs
    /// last and cannot be listed.
    #[arg(short, long, value_delimiter = ',', value_name = "EXTRACTORS")]
    pub extractors: Option<Vec<String>>,

    /// Skip pages whose Markdown file already exists (default: overwrite)
    #[arg(short, long)]
    pub skip_existing: bool,

    /// Show debug-level logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Load pages in headless Chromium so client-side content is rendered
    #[arg(long)]
    pub render: bool,

    /// Minimum delay before each request, in seconds
    #[arg(long, default_value_t = 1.0, value_name = "SECS")]
    pub min_delay: f64,

    /// Maximum delay before each request, in seconds
    #[arg(long, default_value_t = 3.0, value_name = "SECS")]
    pub max_delay: f64,

    /// Per-page fetch timeout, in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Print a JSON report at the end instead of one URL per line
    #[arg(long)]
    pub json: bool,
}
