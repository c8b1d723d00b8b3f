// src/error.rs
// =============================================================================
// Error types shared by the crawler components.
//
// Only InvalidInput ever stops the program. Everything else is local to
// one page: the engine logs it and moves on to the next URL.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[source]: exposes the underlying error through Error::source()
// =============================================================================

use std::path::PathBuf;

/// Errors that abort a crawl before it starts.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Malformed base URL, depth, extractor name or delay window.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A page could not be retrieved. The page is treated as having no links.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("browser error while loading {url}: {message}")]
    Browser { url: String, message: String },
}

/// A single extraction strategy failed. The pipeline tries the next one.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{strategy} failed: {message}")]
    Strategy {
        strategy: &'static str,
        message: String,
    },
}

/// The page could not be saved. The crawl continues without it.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not render {url}: {message}")]
    Render { url: String, message: String },

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url} has no host to build an output path from")]
    NoHost { url: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://example.com/docs/".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/docs/ returned HTTP 404");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = PersistError::Io {
            path: PathBuf::from("out/example.com/index.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/example.com/index.md"));
    }
}
