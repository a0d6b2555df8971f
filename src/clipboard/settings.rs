// src/clipboard/settings.rs
// =============================================================================
// The two bits of state the monitor shares with whatever sits around it
// (a tray menu, a CLI, a test):
//
// - AutoCopySetting: a toggle the outside world flips; the monitor only
//   reads it at the moment it decides whether to write a result back
// - MonitorStatus: what the monitor is doing right now, published through
//   a tokio watch channel so observers always see the latest value
// =============================================================================

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::github::GitHubReference;

// Shared on/off switch for writing fetched content back to the clipboard
//
// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct AutoCopySetting {
    enabled: Arc<AtomicBool>,
}

impl AutoCopySetting {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Default for AutoCopySetting {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Latest state of the monitor, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonitorStatus {
    /// Not started yet
    Idle,
    /// Polling the clipboard
    Watching,
    /// A link was found and its contents are being fetched
    Fetching { reference: GitHubReference },
    /// Contents fetched; `copied` tells whether they went to the clipboard
    Fetched {
        reference: GitHubReference,
        bytes: usize,
        copied: bool,
    },
    /// Fetch failed. A failed write-back still counts as `Fetched`,
    /// with `copied: false`
    Failed {
        reference: GitHubReference,
        message: String,
    },
    /// Monitor loop has exited
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_copy_clones_share_flag() {
        let setting = AutoCopySetting::default();
        let ui_handle = setting.clone();
        assert!(setting.is_enabled());

        ui_handle.set_enabled(false);
        assert!(!setting.is_enabled());
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let status = MonitorStatus::Fetched {
            reference: GitHubReference::new("octo", "hello"),
            bytes: 11,
            copied: true,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "fetched");
        assert_eq!(json["reference"]["owner"], "octo");
        assert_eq!(json["copied"], true);
    }
}
