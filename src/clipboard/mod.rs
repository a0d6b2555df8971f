// src/clipboard/mod.rs
// =============================================================================
// Clipboard watching.
//
// Submodules:
// - backend: the clipboard itself (trait + arboard implementation)
// - settings: the auto-copy toggle and the observable monitor status
// - monitor: the polling loop that ties clipboard, parser and fetcher together
// =============================================================================

mod backend;
mod monitor;
mod settings;

pub use backend::{ClipboardBackend, SystemClipboard};
pub use monitor::{ClipboardMonitor, DEFAULT_INTERVAL};
pub use settings::{AutoCopySetting, MonitorStatus};
