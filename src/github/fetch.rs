// src/github/fetch.rs
// =============================================================================
// This module fetches a textual dump of a GitHub repository from the
// content API.
//
// Request shape:
//   GET https://<host>/<owner>/<repo>/tree/main/<path>
//   Accept: text/markdown
//
// No authentication is sent. The body comes back as one (possibly large)
// markdown-ish text blob which we hand over untouched.
//
// Failure modes:
// - transport problems (DNS, refused connection, timeout) -> FetchError::Network
// - any non-2xx status                                   -> FetchError::Server
// - body that isn't UTF-8                                -> FetchError::Decode
//
// Rust concepts:
// - async functions: For network I/O
// - Traits with async methods: so the clipboard monitor can be tested with
//   a fake fetcher instead of a real HTTP client
// =============================================================================

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use url::Url;

use super::GitHubReference;
use crate::error::FetchError;

// Default content API host
pub const DEFAULT_HOST: &str = "uithub.com";

// Requests that take longer than this are abandoned
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MARKDOWN: &str = "text/markdown";
const BRANCH: &str = "main";

/// Text fetched for one repository (or a path inside it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryContent {
    #[serde(flatten)]
    pub reference: GitHubReference,
    pub path: String,
    /// Length of `text` in bytes
    pub bytes: usize,
    pub text: String,
}

impl RepositoryContent {
    pub fn new(reference: GitHubReference, path: impl Into<String>, text: String) -> Self {
        Self {
            reference,
            path: path.into(),
            bytes: text.len(),
            text,
        }
    }
}

/// Anything that can turn a repository reference into its text contents.
///
/// `ContentFetcher` is the real implementation; the monitor only depends on
/// this trait.
pub trait FetchContents {
    fn fetch(
        &self,
        reference: &GitHubReference,
        path: &str,
    ) -> impl Future<Output = Result<RepositoryContent, FetchError>> + Send;
}

// HTTP client for the content API
//
// Cloning is cheap: reqwest::Client is reference counted internally.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    base_url: Url,
}

impl ContentFetcher {
    // Creates a fetcher for the given host
    //
    // `host` is either a bare host ("uithub.com", https is assumed) or a full
    // base URL ("http://127.0.0.1:8080").
    pub fn new(host: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        let base_url = Url::parse(&base).map_err(|e| FetchError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: base,
                reason: "URL cannot have path segments".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    // Builds the request URL for owner/repo/path
    //
    // Every value goes in as a percent-encoded path segment, so a stray
    // '?' or '#' in a name can't change the shape of the request.
    // `path` may contain '/' to address something below the root.
    pub fn request_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();

        {
            let mut segments = url.path_segments_mut().map_err(|_| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot have path segments".to_string(),
            })?;

            segments
                .pop_if_empty()
                .extend([owner, repo, "tree", BRANCH])
                // An empty path leaves a trailing slash: .../tree/main/
                .extend(path.trim_matches('/').split('/'));
        }

        Ok(url)
    }

    // Fetches the contents of owner/repo (at `path`, "" for the root)
    // and returns the response body as text
    pub async fn fetch_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        let url = self.request_url(owner, repo, path)?;
        log::debug!("GET {}", url);

        let response = self.client.get(url).header(ACCEPT, MARKDOWN).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let text = String::from_utf8(body.to_vec())?;

        Ok(text)
    }
}

impl FetchContents for ContentFetcher {
    async fn fetch(
        &self,
        reference: &GitHubReference,
        path: &str,
    ) -> Result<RepositoryContent, FetchError> {
        let text = self
            .fetch_contents(&reference.owner, &reference.repo, path)
            .await?;

        Ok(RepositoryContent::new(reference.clone(), path, text))
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why response.bytes() and not response.text()?
//    - text() silently replaces invalid UTF-8 with U+FFFD
//    - We want to know when the body isn't text, so we decode ourselves
//
// 2. What does path_segments_mut() do with "a b"?
//    - It percent-encodes each segment: "a b" becomes "a%20b"
//    - '/' inside a segment is encoded too, which is why `path` is split
//      on '/' first
// -----------------------------------------------------------------------------
