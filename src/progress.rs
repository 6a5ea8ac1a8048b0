use crate::entry::Entry;
use crate::search::{SearchObserver, SearchReport};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Bar on stderr counting scanned files against the pre-counted total, with
/// the running match count as its message. A disabled reporter wraps a hidden
/// bar, so callers never have to branch on it.
pub struct ProgressReporter {
    bar: ProgressBar,
    matches: AtomicUsize,
}

impl ProgressReporter {
    /// `None` disables the display; `Some(total)` shows a bar of that length.
    pub fn new(total: Option<u64>) -> Self {
        let bar = match total {
            Some(total) => {
                let style = ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-");
                let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr())
                    .with_style(style);
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
            None => ProgressBar::hidden(),
        };

        Self {
            bar,
            matches: AtomicUsize::new(0),
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn finish(&self, report: &SearchReport) {
        self.bar.finish_with_message(format!(
            "| {} matches in {:.2}s{}",
            report.count(),
            report.elapsed.as_secs_f64(),
            if report.timed_out() { " (timed out)" } else { "" }
        ));
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl SearchObserver for ProgressReporter {
    fn on_entry(&self, _entry: &Entry) {
        self.bar.inc(1);
    }

    fn on_match(&self, _entry: &Entry) {
        let found = self.matches.fetch_add(1, Ordering::Relaxed) + 1;
        self.bar.set_message(format!("| {found} matches"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry() -> Entry {
        Entry {
            path: PathBuf::from("a.txt"),
            is_dir: false,
            size: 1,
            modified: None,
            mode: 0o644,
            depth: 1,
        }
    }

    #[test]
    fn test_disabled_reporter_still_counts() {
        let progress = ProgressReporter::new(None);
        assert!(progress.bar().is_hidden());

        progress.on_entry(&entry());
        progress.on_entry(&entry());
        progress.on_match(&entry());

        assert_eq!(progress.bar().position(), 2);
        assert_eq!(progress.matches.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_enabled_reporter_tracks_total() {
        let progress = ProgressReporter::new(Some(3));
        assert_eq!(progress.bar().length(), Some(3));

        progress.on_entry(&entry());
        assert_eq!(progress.bar().position(), 1);
        progress.abandon();
    }
}
