// src/github/parse.rs
// =============================================================================
// Turns a piece of clipboard text into a GitHub repository reference.
//
// Rules:
// - The candidate must parse as an absolute URL (via the `url` crate)
// - Its host must be exactly github.com
// - Its path, with empty segments removed, must have at least two segments
// - owner/repo are the first two segments, percent-decoded back to the
//   text that was typed (a trailing ".git" on the repo is dropped,
//   anything after is ignored)
//
// Clipboard text is often more than a bare link ("check this out <url>."),
// so we look at each whitespace separated word that mentions github.com
// (in any letter case), strip brackets/quotes around it and sentence
// punctuation after it, and take the first one that qualifies.
//
// Failure is never an error: it's just `None`.
// =============================================================================

use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::fmt;
use url::Url;

// The only host we accept
pub const GITHUB_HOST: &str = "github.com";

// Characters commonly wrapped around links in chat/markdown text
const LINK_WRAPPERS: &[char] = &['<', '>', '(', ')', '[', ']', '"', '\''];

// Punctuation that ends a sentence right after a link
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// An (owner, repo) pair pulled out of a GitHub URL.
///
/// Both fields are non-empty. No character-set validation is done on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GitHubReference {
    pub owner: String,
    pub repo: String,
}

impl GitHubReference {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for GitHubReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// Extracts a repository reference from arbitrary text
//
// Examples:
//   "https://github.com/rust-lang/rust"             -> rust-lang/rust
//   "https://github.com/user/repo.git"              -> user/repo
//   "https://github.com/user/repo/tree/main/src"    -> user/repo
//   "check this out https://github.com/apple/swift" -> apple/swift
//   "https://gitlab.com/user/repo"                  -> None
pub fn extract_reference(input: &str) -> Option<GitHubReference> {
    // A URL never contains raw whitespace, so each word is a candidate.
    // (Url::parse would happily percent-encode "https://github.com/a/b c".)
    input
        .split_whitespace()
        .filter(|word| word.to_ascii_lowercase().contains(GITHUB_HOST))
        .map(strip_surroundings)
        .find_map(parse_repository_url)
}

// "(https://github.com/a/b)." -> "https://github.com/a/b"
fn strip_surroundings(word: &str) -> &str {
    word.trim_start_matches(LINK_WRAPPERS)
        .trim_end_matches(|c| LINK_WRAPPERS.contains(&c) || TRAILING_PUNCTUATION.contains(&c))
}

// Validates a single URL candidate
fn parse_repository_url(candidate: &str) -> Option<GitHubReference> {
    let url = Url::parse(candidate).ok()?;

    // host_str() is already lower-cased by the url crate
    if url.host_str()? != GITHUB_HOST {
        return None;
    }

    // path_segments() hands back the percent-encoded form Url::parse made,
    // so "ünï" comes out as "%C3%BCn%C3%AF"
    let mut segments = url.path_segments()?.filter(|segment| !segment.is_empty());
    let owner = decode_segment(segments.next()?)?;
    let repo = decode_segment(segments.next()?)?;

    let repo = repo.strip_suffix(".git").unwrap_or(repo.as_str());
    if repo.is_empty() {
        return None;
    }

    Some(GitHubReference::new(owner, repo))
}

fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(owner: &str, repo: &str) -> Option<GitHubReference> {
        Some(GitHubReference::new(owner, repo))
    }

    #[test]
    fn test_plain_repository_url() {
        assert_eq!(
            extract_reference("https://github.com/rust-lang/rust"),
            reference("rust-lang", "rust")
        );
    }

    #[test]
    fn test_owner_and_repo_are_taken_verbatim() {
        for (owner, repo) in [("octo", "hello"), ("A_b-c", "x.y.z"), ("123", "--")] {
            let url = format!("https://github.com/{}/{}", owner, repo);
            assert_eq!(extract_reference(&url), reference(owner, repo), "{}", url);
        }
    }

    #[test]
    fn test_git_suffix_and_extra_segments_are_ignored() {
        assert_eq!(
            extract_reference("https://github.com/user/repo.git"),
            reference("user", "repo")
        );
        assert_eq!(
            extract_reference("https://github.com/user/repo/tree/main/src/lib.rs"),
            reference("user", "repo")
        );
        assert_eq!(
            extract_reference("https://github.com//user//repo/"),
            reference("user", "repo")
        );
    }

    #[test]
    fn test_link_inside_text() {
        assert_eq!(
            extract_reference("check this out https://github.com/apple/swift.git"),
            reference("apple", "swift")
        );
        assert_eq!(
            extract_reference("see (https://github.com/octo/hello) for details"),
            reference("octo", "hello")
        );
        assert_eq!(
            extract_reference("https://github.com/apple/swift is great"),
            reference("apple", "swift")
        );
    }

    #[test]
    fn test_first_valid_link_wins() {
        assert_eq!(
            extract_reference("https://github.com/only https://github.com/a/b https://github.com/c/d"),
            reference("a", "b")
        );
    }

    #[test]
    fn test_host_letter_case_does_not_matter() {
        assert_eq!(extract_reference("https://GitHub.com/a/b"), reference("a", "b"));
        assert_eq!(
            extract_reference("look: HTTPS://GITHUB.COM/Octo/Hello"),
            reference("Octo", "Hello")
        );
    }

    #[test]
    fn test_trailing_sentence_punctuation() {
        assert_eq!(
            extract_reference("see https://github.com/apple/swift."),
            reference("apple", "swift")
        );
        assert_eq!(
            extract_reference("(https://github.com/apple/swift.git), or not!"),
            reference("apple", "swift")
        );
        assert_eq!(
            extract_reference("is it https://github.com/octo/hello?"),
            reference("octo", "hello")
        );
    }

    #[test]
    fn test_segments_are_percent_decoded() {
        assert_eq!(
            extract_reference("https://github.com/ünï/repo"),
            reference("ünï", "repo")
        );
        assert_eq!(
            extract_reference("https://github.com/a%20b/c%2Dd"),
            reference("a b", "c-d")
        );
        // Not valid UTF-8 once decoded
        assert_eq!(extract_reference("https://github.com/%FF/repo"), None);
    }

    #[test]
    fn test_wrong_host_is_rejected() {
        assert_eq!(extract_reference("https://gitlab.com/user/repo"), None);
        assert_eq!(extract_reference("https://www.github.com/user/repo"), None);
        assert_eq!(extract_reference("https://github.com.evil.io/user/repo"), None);
    }

    #[test]
    fn test_too_few_segments_is_rejected() {
        assert_eq!(extract_reference("https://github.com"), None);
        assert_eq!(extract_reference("https://github.com/"), None);
        assert_eq!(extract_reference("https://github.com/user"), None);
        assert_eq!(extract_reference("https://github.com/user/.git"), None);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert_eq!(extract_reference(""), None);
        assert_eq!(extract_reference("github.com/user/repo"), None);
        assert_eq!(extract_reference("not a url at all"), None);
        assert_eq!(extract_reference("http://[::1"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(GitHubReference::new("octo", "hello").to_string(), "octo/hello");
    }
}
