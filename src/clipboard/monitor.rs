// src/clipboard/monitor.rs
// =============================================================================
// The clipboard monitor: polls the clipboard, spots GitHub repository links,
// fetches their contents and (optionally) puts the result on the clipboard.
//
// Each tick:
// 1. Compare the clipboard change counter with the stored baseline.
//    Unchanged -> nothing to do (we don't even read the text).
// 2. Changed -> store the new counter, read the text. No text -> done.
// 3. Text doesn't mention github.com -> done (cheap check before parsing).
// 4. Text equals the last string we processed -> done.
// 5. Otherwise process it: remember it, parse it, fetch, write back.
//
// After a write-back the baseline is refreshed to the post-write counter, so
// our own output never looks like a new clipboard change.
//
// Ticks are strictly sequential: the next sleep only starts once the
// previous tick (including its fetch) is finished, so there is never more
// than one fetch in flight.
//
// Stopping is cooperative through a CancellationToken. It's checked while
// sleeping, raced against an in-flight fetch, and checked once more before
// writing anything to the clipboard.
// =============================================================================

use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::backend::ClipboardBackend;
use super::settings::{AutoCopySetting, MonitorStatus};
use crate::github::{extract_reference, FetchContents, RepositoryContent, GITHUB_HOST};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(750);

// Per-session bookkeeping, reset when the monitor stops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub last_change_count: u64,
    pub last_processed: String,
    pub is_running: bool,
}

// What a single tick ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Change counter didn't move
    Unchanged,
    /// Clipboard changed but holds no text
    NoText,
    /// Text doesn't mention github.com
    NotGitHub,
    /// Same text as the last one processed
    Duplicate,
    /// Mentions github.com but isn't a repository URL
    NotRepository,
    /// Contents fetched; `copied` is true if they were written back
    Fetched { copied: bool },
    FetchFailed,
    /// Clipboard couldn't be read this tick
    ClipboardFailed,
    /// Cancellation was requested while processing
    Cancelled,
}

pub struct ClipboardMonitor<C, F> {
    clipboard: C,
    fetcher: F,
    auto_copy: AutoCopySetting,
    interval: Duration,
    // Sub-path requested from the content API ("" = repository root)
    path: String,
    state: MonitorState,
    status: watch::Sender<MonitorStatus>,
}

impl<C: ClipboardBackend, F: FetchContents> ClipboardMonitor<C, F> {
    pub fn new(clipboard: C, fetcher: F, auto_copy: AutoCopySetting, interval: Duration) -> Self {
        let (status, _) = watch::channel(MonitorStatus::Idle);

        Self {
            clipboard,
            fetcher,
            auto_copy,
            interval,
            path: String::new(),
            state: MonitorState::default(),
            status,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    // Subscribe to status updates
    pub fn subscribe(&self) -> watch::Receiver<MonitorStatus> {
        self.status.subscribe()
    }

    #[cfg(test)]
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    // Runs until `cancel` is triggered
    pub async fn run(&mut self, cancel: CancellationToken) {
        self.start();

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }

            if self.tick(&cancel).await == TickOutcome::Cancelled {
                break;
            }
        }

        self.stop();
    }

    // Idle -> Polling: take the current counter as the baseline, so whatever
    // is already on the clipboard isn't treated as new
    fn start(&mut self) {
        let baseline = match self.clipboard.change_count() {
            Ok(count) => count,
            Err(e) => {
                log::warn!("Could not read clipboard on start: {}", e);
                0
            }
        };

        self.state = MonitorState {
            last_change_count: baseline,
            last_processed: String::new(),
            is_running: true,
        };
        self.status.send_replace(MonitorStatus::Watching);

        log::info!("Clipboard monitor started ({}ms interval)", self.interval.as_millis());
    }

    fn stop(&mut self) {
        self.state = MonitorState::default();
        self.status.send_replace(MonitorStatus::Stopped);
        log::info!("Clipboard monitor stopped");
    }

    async fn tick(&mut self, cancel: &CancellationToken) -> TickOutcome {
        let count = match self.clipboard.change_count() {
            Ok(count) => count,
            Err(e) => {
                log::warn!("{}", e);
                return TickOutcome::ClipboardFailed;
            }
        };

        if count == self.state.last_change_count {
            return TickOutcome::Unchanged;
        }
        self.state.last_change_count = count;

        let text = match self.clipboard.read_string() {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return TickOutcome::NoText,
            Err(e) => {
                log::warn!("{}", e);
                return TickOutcome::ClipboardFailed;
            }
        };

        if !text.contains(GITHUB_HOST) {
            return TickOutcome::NotGitHub;
        }

        if text == self.state.last_processed {
            log::debug!("Skipping link that was already processed");
            return TickOutcome::Duplicate;
        }

        self.process(text, cancel).await
    }

    async fn process(&mut self, text: String, cancel: &CancellationToken) -> TickOutcome {
        self.state.last_processed = text;

        let Some(reference) = extract_reference(&self.state.last_processed) else {
            log::debug!("Clipboard mentions {} but has no repository URL", GITHUB_HOST);
            return TickOutcome::NotRepository;
        };

        log::info!("Fetching contents of {}", reference);
        self.status.send_replace(MonitorStatus::Fetching {
            reference: reference.clone(),
        });

        // Dropping the fetch future on cancel aborts the request in reqwest;
        // nothing has touched the clipboard at that point
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return TickOutcome::Cancelled,
            result = self.fetcher.fetch(&reference, &self.path) => result,
        };

        if cancel.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        match result {
            Ok(content) => {
                let copied = self.auto_copy.is_enabled() && self.write_back(&content);
                log::info!(
                    "Fetched {} ({} bytes){}",
                    reference,
                    content.bytes,
                    if copied { ", copied to clipboard" } else { "" }
                );
                self.status.send_replace(MonitorStatus::Fetched {
                    reference,
                    bytes: content.bytes,
                    copied,
                });
                TickOutcome::Fetched { copied }
            }
            Err(e) => {
                log::warn!("Failed to fetch {} ({}): {}", reference, e.kind(), e);
                self.status.send_replace(MonitorStatus::Failed {
                    reference,
                    message: e.to_string(),
                });
                TickOutcome::FetchFailed
            }
        }
    }

    // Puts the fetched text on the clipboard and moves the baseline past
    // our own write. Returns whether the write happened.
    fn write_back(&mut self, content: &RepositoryContent) -> bool {
        if let Err(e) = self.clipboard.write_string(&content.text) {
            log::warn!("{}", e);
            return false;
        }

        match self.clipboard.change_count() {
            Ok(count) => self.state.last_change_count = count,
            // Best guess: our write was the only one
            Err(_) => self.state.last_change_count += 1,
        }

        true
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why generics instead of Box<dyn ...>?
//    - FetchContents has an async method (returns impl Future), which can't
//      be used through a trait object without boxing every future
//    - The monitor is built once, so the generic parameters cost nothing
//
// 2. Why tokio::select! with `biased;`?
//    - Without it select! polls branches in random order
//    - With it the cancellation branch is always checked first, so a stop
//      request wins over a sleep or fetch that finishes at the same moment
//
// 3. Why does run() take &mut self instead of self?
//    - Callers (and tests) keep the monitor after it stops, e.g. to read
//      the final status from the watch channel
// -----------------------------------------------------------------------------
