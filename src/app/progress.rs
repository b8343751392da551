//! Download progress bar for interactive terminals.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use release_artifacts::ProgressReporter;

const BAR_TEMPLATE: &str =
    "{msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} ({bytes_per_sec})";

/// Draws one bar per download on stderr.
///
/// A sized bar is used when the server reports a Content-Length, a
/// spinner otherwise.
#[derive(Debug, Default)]
pub(crate) struct TerminalProgress {
    current: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        // A poisoned lock only loses display state.
        let mut guard = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

fn new_bar(name: &str, total_bytes: Option<u64>) -> ProgressBar {
    let bar = match total_bytes {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .map(|style| style.progress_chars("=> "))
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(name.to_string());
    bar
}

impl ProgressReporter for TerminalProgress {
    fn started(&self, name: &str, total_bytes: Option<u64>) {
        self.with_bar(|slot| {
            if let Some(previous) = slot.take() {
                previous.finish_and_clear();
            }
            *slot = Some(new_bar(name, total_bytes));
        });
    }

    fn advanced(&self, bytes: u64) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.as_ref() {
                bar.inc(bytes);
            }
        });
    }

    fn finished(&self, _name: &str) {
        self.with_bar(|slot| {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracks_current_bar() {
        let progress = TerminalProgress::new();
        progress.started("a.zip", Some(10));
        progress.advanced(4);
        {
            let guard = progress.current.lock().unwrap();
            let bar = guard.as_ref().unwrap();
            assert_eq!(bar.position(), 4);
            assert_eq!(bar.length(), Some(10));
        }
        progress.finished("a.zip");
        assert!(progress.current.lock().unwrap().is_none());
    }

    #[test]
    fn test_progress_without_length_uses_spinner() {
        let progress = TerminalProgress::new();
        progress.started("b.tar.xz", None);
        progress.advanced(7);
        {
            let guard = progress.current.lock().unwrap();
            let bar = guard.as_ref().unwrap();
            assert_eq!(bar.position(), 7);
            assert_eq!(bar.length(), None);
        }
        progress.finished("b.tar.xz");
    }

    #[test]
    fn test_advanced_without_start_is_ignored() {
        let progress = TerminalProgress::new();
        progress.advanced(3);
        progress.finished("never-started");
        assert!(progress.current.lock().unwrap().is_none());
    }
}
