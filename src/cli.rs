// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - watch: keep running, watching the clipboard for GitHub links
// - fetch: fetch one repository right now and print its contents
//
// Rust concepts:
// - Derive macros: clap generates the parsing code from these structs
// - value_parser ranges: clap validates numeric bounds for us
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::clipboard::DEFAULT_INTERVAL;
use crate::github::{DEFAULT_HOST, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(
    name = "repo-clip",
    version,
    about = "Watches the clipboard for GitHub repository links and fetches their contents as text",
    long_about = "repo-clip watches your clipboard. When you copy a GitHub repository URL it fetches \
                  a markdown dump of that repository from the content API and, if auto-copy is on, \
                  puts it on the clipboard in place of the link."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the clipboard until Ctrl-C
    ///
    /// Example: repo-clip watch --interval-ms 500
    Watch {
        #[command(flatten)]
        api: ApiArgs,

        /// Polling interval in milliseconds (100-10000)
        #[arg(long, default_value_t = DEFAULT_INTERVAL.as_millis() as u64, value_parser = clap::value_parser!(u64).range(100..=10_000))]
        interval_ms: u64,

        /// Only fetch, never replace the clipboard contents
        #[arg(long)]
        no_auto_copy: bool,

        /// Path inside each repository to fetch (default: repository root)
        #[arg(long, default_value = "")]
        path: String,
    },

    /// Fetch one repository and print its contents
    ///
    /// Example: repo-clip fetch https://github.com/rust-lang/rust --path src
    Fetch {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        #[command(flatten)]
        api: ApiArgs,

        /// Path inside the repository (default: repository root)
        #[arg(long, default_value = "")]
        path: String,

        /// Also put the contents on the clipboard
        #[arg(long)]
        copy: bool,

        /// Output a JSON object instead of the raw text
        #[arg(long)]
        json: bool,
    },
}

// Options shared by both subcommands
#[derive(Args, Debug)]
pub struct ApiArgs {
    /// Content API host, or a full base URL
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_defaults() {
        let cli = Cli::try_parse_from(["repo-clip", "watch"]).unwrap();
        match cli.command {
            Commands::Watch {
                api,
                interval_ms,
                no_auto_copy,
                path,
            } => {
                assert_eq!(api.host, DEFAULT_HOST);
                assert_eq!(api.timeout(), Duration::from_secs(20));
                assert_eq!(interval_ms, 750);
                assert!(!no_auto_copy);
                assert_eq!(path, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_interval_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["repo-clip", "watch", "--interval-ms", "5"]).is_err());
    }

    #[test]
    fn test_fetch_flags() {
        let cli = Cli::try_parse_from([
            "repo-clip",
            "fetch",
            "https://github.com/octo/hello",
            "--host",
            "http://localhost:8080",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Fetch {
                repo_url,
                api,
                copy,
                json,
                ..
            } => {
                assert_eq!(repo_url, "https://github.com/octo/hello");
                assert_eq!(api.host, "http://localhost:8080");
                assert!(json);
                assert!(!copy);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
