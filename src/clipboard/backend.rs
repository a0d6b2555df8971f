// src/clipboard/backend.rs
// =============================================================================
// The clipboard as the monitor sees it: read a string, write a string, and
// ask for a change counter that goes up on every write from anyone.
//
// SystemClipboard is the real thing, built on `arboard`. arboard has no
// notion of a change counter, so we synthesise one: every time we're asked
// we hash the current text (blake3) and bump the counter if the hash moved.
// Our own writes bump it too, exactly like an OS-maintained counter would.
// =============================================================================

use arboard::Clipboard;

use crate::error::ClipboardError;

/// Minimal clipboard surface used by the monitor.
pub trait ClipboardBackend {
    /// Monotonic counter, incremented on every clipboard write (any source).
    fn change_count(&mut self) -> Result<u64, ClipboardError>;

    /// Current text content, `None` if the clipboard holds no text.
    fn read_string(&mut self) -> Result<Option<String>, ClipboardError>;

    fn write_string(&mut self, text: &str) -> Result<(), ClipboardError>;
}

// Change counter derived from content hashes
//
// `observe` is fed whatever text is on the clipboard right now (None for
// no text) and bumps the count when it differs from the last text seen.
// `record_write` is for our own writes: always a bump, and the written
// text becomes the last seen one.
#[derive(Debug, Default)]
struct HashCounter {
    last_hash: Option<blake3::Hash>,
    count: u64,
}

impl HashCounter {
    fn observe(&mut self, text: Option<&str>) -> u64 {
        let hash = text.map(|text| blake3::hash(text.as_bytes()));

        if hash != self.last_hash {
            self.last_hash = hash;
            self.count += 1;
        }

        self.count
    }

    fn record_write(&mut self, text: &str) -> u64 {
        self.last_hash = Some(blake3::hash(text.as_bytes()));
        self.count += 1;
        self.count
    }
}

// System clipboard with a hash-derived change counter
pub struct SystemClipboard {
    clipboard: Clipboard,
    counter: HashCounter,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard = Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;

        Ok(Self {
            clipboard,
            counter: HashCounter::default(),
        })
    }

    fn current_text(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            // Empty clipboard, or something that isn't text (an image, files...)
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}

impl ClipboardBackend for SystemClipboard {
    fn change_count(&mut self) -> Result<u64, ClipboardError> {
        let text = self.current_text()?;
        Ok(self.counter.observe(text.as_deref()))
    }

    fn read_string(&mut self) -> Result<Option<String>, ClipboardError> {
        self.current_text()
    }

    fn write_string(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))?;

        self.counter.record_write(text);

        Ok(())
    }
}
