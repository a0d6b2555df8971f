// src/main.rs
// =============================================================================
// This is the entry point of repo-clip.
//
// What happens here:
// 1. Set up logging (env_logger, RUST_LOG overrides the default level)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the subcommand handler (watch or fetch)
// 4. Exit with a proper code (0 = success, 1 = fetch failed, 2 = error)
//
// `watch` runs the clipboard monitor until Ctrl-C. On Unix, SIGUSR1 flips
// auto-copy on and off while it runs.
// =============================================================================

mod cli;
mod clipboard;
mod error;
mod github;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use cli::{ApiArgs, Cli, Commands};
use clipboard::{AutoCopySetting, ClipboardBackend, ClipboardMonitor, MonitorStatus, SystemClipboard};
use github::{ContentFetcher, FetchContents, RepositoryContent};

#[tokio::main]
async fn main() {
    // Monitor progress goes to stdout; logs are for warnings unless asked for
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            api,
            interval_ms,
            no_auto_copy,
            path,
        } => handle_watch(&api, Duration::from_millis(interval_ms), !no_auto_copy, path).await,
        Commands::Fetch {
            repo_url,
            api,
            path,
            copy,
            json,
        } => handle_fetch(&repo_url, &api, &path, copy, json).await,
    }
}

// Handles the 'watch' subcommand
async fn handle_watch(
    api: &ApiArgs,
    interval: Duration,
    auto_copy: bool,
    path: String,
) -> Result<i32> {
    let fetcher = ContentFetcher::new(&api.host, api.timeout()).context("Invalid --host")?;
    let clipboard = SystemClipboard::new()?;
    let auto_copy = AutoCopySetting::new(auto_copy);

    let mut monitor =
        ClipboardMonitor::new(clipboard, fetcher, auto_copy.clone(), interval).with_path(path);

    let printer = {
        let mut status = monitor.subscribe();
        tokio::spawn(async move {
            while status.changed().await.is_ok() {
                let current = status.borrow_and_update().clone();
                print_status(&current);
            }
        })
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => cancel.cancel(),
                Err(e) => log::error!("Unable to listen for Ctrl-C: {}", e),
            }
        }
    });

    #[cfg(unix)]
    spawn_auto_copy_toggle(auto_copy.clone());

    println!(
        "👀 Watching the clipboard for GitHub links (auto-copy {}, Ctrl-C to stop)",
        if auto_copy.is_enabled() { "on" } else { "off" }
    );

    monitor.run(cancel).await;

    // Dropping the monitor closes the status channel, which ends the printer
    drop(monitor);
    if let Err(e) = printer.await {
        log::warn!("Status printer stopped abnormally: {}", e);
    }

    Ok(0)
}

// Handles the 'fetch' subcommand
//
// Progress goes to stderr so stdout only carries the content itself
async fn handle_fetch(
    repo_url: &str,
    api: &ApiArgs,
    path: &str,
    copy: bool,
    json: bool,
) -> Result<i32> {
    let Some(reference) = github::extract_reference(repo_url) else {
        eprintln!("❌ Not a GitHub repository URL: {}", repo_url);
        return Ok(1);
    };

    let fetcher = ContentFetcher::new(&api.host, api.timeout()).context("Invalid --host")?;

    eprintln!("🔍 Fetching {} from {}", reference, api.host);

    let content = match fetcher.fetch(&reference, path).await {
        Ok(content) => content,
        Err(e) => {
            eprintln!("❌ Failed to fetch {}: {}", reference, e);
            return Ok(1);
        }
    };

    if copy {
        let mut clipboard = SystemClipboard::new()?;
        clipboard.write_string(&content.text)?;
        eprintln!("📋 Copied {} bytes to the clipboard", content.bytes);
    }

    print_content(&content, json)?;

    Ok(0)
}

// Flips auto-copy whenever the process receives SIGUSR1
#[cfg(unix)]
fn spawn_auto_copy_toggle(auto_copy: AutoCopySetting) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut toggles = match signal(SignalKind::user_defined1()) {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("Unable to listen for SIGUSR1: {}", e);
                return;
            }
        };

        while toggles.recv().await.is_some() {
            let enabled = !auto_copy.is_enabled();
            auto_copy.set_enabled(enabled);
            println!("🔁 Auto-copy {}", if enabled { "on" } else { "off" });
        }
    });
}

fn print_content(content: &RepositoryContent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(content)?);
    } else {
        print!("{}", content.text);
        if !content.text.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn print_status(status: &MonitorStatus) {
    match status {
        MonitorStatus::Fetching { reference } => println!("🔍 Fetching {}", reference),
        MonitorStatus::Fetched {
            reference,
            bytes,
            copied: true,
        } => println!("📋 Copied {} ({} bytes) to the clipboard", reference, bytes),
        MonitorStatus::Fetched {
            reference,
            bytes,
            copied: false,
        } => println!("✅ Fetched {} ({} bytes)", reference, bytes),
        MonitorStatus::Failed { reference, message } => {
            println!("❌ Failed to fetch {}: {}", reference, message)
        }
        MonitorStatus::Stopped => println!("👋 Stopped watching the clipboard"),
        MonitorStatus::Idle | MonitorStatus::Watching => {}
    }
}
