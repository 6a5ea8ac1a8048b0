//! Search orchestration: name mode runs inline, content and regex modes fan
//! out over a worker pool
mod content;
mod name;

use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::entry::Entry;
use crate::error::{Result, RfseekError};
use crate::filter::CompositeFilter;
use crate::matcher::{LiteralMatcher, Matcher, RegexMatcher, WildcardMatcher};
use crate::walker::walk_tree;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Wildcard match on file names.
    Name,
    /// Literal substring in file content.
    Content,
    /// Regular expression against each line of file content.
    Regex,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Name => write!(f, "name"),
            SearchMode::Content => write!(f, "content"),
            SearchMode::Regex => write!(f, "regex"),
        }
    }
}

/// How a search ended. A failed walk is reported as an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Completed,
    TimedOut,
}

#[derive(Debug)]
pub struct SearchReport {
    /// Traversal order in name mode; unspecified in content and regex mode.
    pub matches: Vec<Entry>,
    pub status: SearchStatus,
    /// Files handed to the matcher.
    pub files_scanned: usize,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn timed_out(&self) -> bool {
        self.status == SearchStatus::TimedOut
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.matches.iter().map(|m| &m.path)
    }
}

/// Receives events while a search runs.
///
/// `on_entry` may be called from several worker threads at once;
/// `on_match` is only ever called from one thread at a time.
pub trait SearchObserver: Send + Sync {
    fn on_entry(&self, _entry: &Entry) {}
    fn on_match(&self, _entry: &Entry) {}
}

impl SearchObserver for () {}

impl<A: SearchObserver, B: SearchObserver> SearchObserver for (A, B) {
    fn on_entry(&self, entry: &Entry) {
        self.0.on_entry(entry);
        self.1.on_entry(entry);
    }

    fn on_match(&self, entry: &Entry) {
        self.0.on_match(entry);
        self.1.on_match(entry);
    }
}

impl<T: SearchObserver + ?Sized> SearchObserver for &T {
    fn on_entry(&self, entry: &Entry) {
        (**self).on_entry(entry);
    }

    fn on_match(&self, entry: &Entry) {
        (**self).on_match(entry);
    }
}

/// One search: the filter chain and matcher built from a config, used once.
pub struct Searcher<'a> {
    config: &'a SearchConfig,
    mode: SearchMode,
    filter: CompositeFilter,
    matcher: Box<dyn Matcher>,
}

impl<'a> Searcher<'a> {
    /// Fails on an invalid config or regex, before anything touches the disk.
    pub fn new(config: &'a SearchConfig, mode: SearchMode, pattern: &str) -> Result<Self> {
        config.validate()?;

        let matcher: Box<dyn Matcher> = match mode {
            SearchMode::Name => Box::new(WildcardMatcher::new(pattern, config.ignore_case)),
            SearchMode::Content => Box::new(LiteralMatcher::new(pattern, config.ignore_case)),
            SearchMode::Regex => Box::new(RegexMatcher::new(pattern, config.ignore_case)?),
        };

        Ok(Self {
            config,
            mode,
            filter: CompositeFilter::from_config(config),
            matcher,
        })
    }

    fn check_root(&self) -> Result<()> {
        let root = &self.config.root;
        fs::metadata(root).map(|_| ()).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RfseekError::PathNotFound(root.clone()),
            _ => RfseekError::Io(e),
        })
    }

    /// Number of files a search would hand to the matcher, for sizing a
    /// progress bar. Walks the tree once with the same filters and no deadline.
    pub fn count_files(&self) -> Result<u64> {
        self.check_root()?;
        let mut total = 0;
        walk_tree(self.config, &self.filter, &CancelToken::none(), |_| {
            total += 1;
            Ok(())
        })?;
        debug!("Counted {total} candidate files under {}", self.config.root.display());
        Ok(total)
    }

    pub fn search(&self, observer: &dyn SearchObserver) -> Result<SearchReport> {
        self.check_root()?;
        let root = &self.config.root;

        let cancel = CancelToken::with_timeout(self.config.timeout);
        info!(
            "Starting {} search in {} (workers: {}, timeout: {:?})",
            self.mode,
            root.display(),
            self.config.workers,
            self.config.timeout
        );

        let start = Instant::now();
        let mut report = match self.mode {
            SearchMode::Name => name::run(
                self.config,
                &self.filter,
                self.matcher.as_ref(),
                &cancel,
                observer,
            )?,
            SearchMode::Content | SearchMode::Regex => content::run(
                self.config,
                &self.filter,
                self.matcher.as_ref(),
                cancel,
                observer,
            )?,
        };
        report.elapsed = start.elapsed();

        if report.timed_out() {
            info!("Deadline exceeded after {:.2?}", report.elapsed);
        }
        info!(
            "Search finished: {} matches in {} files scanned ({:.2?})",
            report.count(),
            report.files_scanned,
            report.elapsed
        );

        Ok(report)
    }
}

/// Builds a searcher for `config` and runs it once.
pub fn search(
    config: &SearchConfig,
    mode: SearchMode,
    pattern: &str,
    observer: &dyn SearchObserver,
) -> Result<SearchReport> {
    Searcher::new(config, mode, pattern)?.search(observer)
}
