// src/github/mod.rs
// =============================================================================
// Everything GitHub-specific:
// - parse: recognising a GitHub repository URL and pulling out owner/repo
// - fetch: retrieving a repository's contents as text from the content API
// =============================================================================

mod fetch;
mod parse;

pub use fetch::{ContentFetcher, FetchContents, RepositoryContent, DEFAULT_HOST, DEFAULT_TIMEOUT};
pub use parse::{extract_reference, GitHubReference, GITHUB_HOST};
