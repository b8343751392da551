//! Progress callbacks for streaming downloads.

/// Receives byte-level progress for one download at a time.
///
/// All methods default to no-ops so implementors only override what they
/// display.
pub trait ProgressReporter: Send + Sync {
    /// A download started; `total_bytes` is the Content-Length when known.
    fn started(&self, _name: &str, _total_bytes: Option<u64>) {}

    /// `bytes` more bytes were written to disk.
    fn advanced(&self, _bytes: u64) {}

    /// The current download finished (successfully or not).
    fn finished(&self, _name: &str) {}
}

/// Reporter that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}
