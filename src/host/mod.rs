//! Host collaborators
//!
//! The engine talks to its embedding application only through these traits:
//! re-query requests, clipboard access, speech output and a clock. All of
//! them must be callable from background tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Asks the host to restart a query with the given raw text
pub trait RequeryHost: Send + Sync {
    fn request_requery(&self, text: &str);
}

/// Clipboard read/write
pub trait ClipboardAccess: Send + Sync {
    fn read_text(&self) -> Option<String>;

    fn write_text(&self, text: &str);
}

/// Text-to-speech output, fire-and-forget
pub trait SpeechOutput: Send + Sync {
    fn read(&self, text: &str);
}

/// Millisecond clock used to timestamp observations
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Monotonic clock measured from its creation
#[derive(Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Forwards requery requests into a channel drained by the host loop
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RequeryHost for ChannelHost {
    fn request_requery(&self, text: &str) {
        if self.tx.send(text.to_string()).is_err() {
            warn!("Requery for '{}' dropped: host loop has stopped", text);
        }
    }
}

/// Records requery requests
#[derive(Debug, Default)]
pub struct RecordingHost {
    requests: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RequeryHost for RecordingHost {
    fn request_requery(&self, text: &str) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
        }
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn read_text(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_text(&self, text: &str) {
        *self.text.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
    }
}

/// Speech output that only logs
#[derive(Debug, Default)]
pub struct LogSpeech;

impl SpeechOutput for LogSpeech {
    fn read(&self, text: &str) {
        debug!("Speech output: {}", text);
    }
}

/// Records every text read aloud
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn read(&self, text: &str) {
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        clock.advance(50);
        assert_eq!(clock.now_millis(), 150);
        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert!(clipboard.read_text().is_none());
        clipboard.write_text("bonjour");
        assert_eq!(clipboard.read_text().as_deref(), Some("bonjour"));
    }

    #[tokio::test]
    async fn test_channel_host() {
        let (host, mut rx) = ChannelHost::new();
        host.request_requery("hello");
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }
}
