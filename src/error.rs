// src/error.rs
// =============================================================================
// Typed errors for the two things that can go wrong while processing a link:
// talking to the content API and talking to the system clipboard.
//
// main.rs still uses anyhow::Result for the application glue; these types are
// what the fetcher and the clipboard backend return so the monitor can tell
// failure kinds apart (and report them in its status value).
//
// Note there is no "parse error" type here: a clipboard string that isn't a
// GitHub repository URL is just `None` from github::extract_reference.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error and Display
// - #[source] / #[from]: keep the underlying error for error chains
// =============================================================================

use thiserror::Error;

// Everything that can go wrong while fetching repository contents
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connection refused, TLS, timeout...
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not valid UTF-8 text
    #[error("response body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The content API answered with a non-2xx status code
    #[error("content API returned HTTP {status}")]
    Server { status: u16 },

    /// The configured host could not be turned into a request URL
    #[error("invalid content API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    // Short label used in log lines and the monitor status
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(e) if e.is_timeout() => "timeout",
            FetchError::Network(_) => "network",
            FetchError::Decode(_) => "decode",
            FetchError::Server { .. } => "server",
            FetchError::InvalidUrl { .. } => "config",
        }
    }
}

// Errors from the clipboard subsystem
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read clipboard: {0}")]
    Read(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}
