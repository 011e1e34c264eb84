use std::path::PathBuf;

use reqwest::StatusCode;

/// Result type used across the filter engine.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Failures while retrieving the source playlist.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("all {attempts} playlist sources failed, last error: {last}")]
    SourceExhausted {
        attempts: usize,
        #[source]
        last: Box<FetchError>,
    },

    #[error("no playlist sources configured")]
    NoSources,
}

impl FetchError {
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn http_status(status: StatusCode, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Classifies a transport error, keeping timeouts distinct from other network failures.
    pub fn from_request(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_owned(),
            }
        } else {
            Self::Network { source: err }
        }
    }

    pub fn source_exhausted(attempts: usize, last: FetchError) -> Self {
        Self::SourceExhausted {
            attempts,
            last: Box::new(last),
        }
    }
}

/// Top-level error for a filter run.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Reserved for unrecoverable structural failures; malformed entries are skipped instead.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl FilterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
