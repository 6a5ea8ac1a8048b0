use super::{SearchObserver, SearchReport, SearchStatus};
use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::filter::EntryFilter;
use crate::matcher::Matcher;
use crate::walker::walk_tree;
use std::time::Duration;

/// Matches file names inline during the walk; matches are emitted in
/// traversal order.
pub(super) fn run(
    config: &SearchConfig,
    filter: &dyn EntryFilter,
    matcher: &dyn Matcher,
    cancel: &CancelToken,
    observer: &dyn SearchObserver,
) -> Result<SearchReport> {
    let mut matches = Vec::new();
    let mut files_scanned = 0;

    let walked = walk_tree(config, filter, cancel, |entry| {
        files_scanned += 1;
        observer.on_entry(&entry);
        if matcher.matches(cancel, &entry.path)? {
            observer.on_match(&entry);
            matches.push(entry);
        }
        Ok(())
    });

    let status = match walked {
        Ok(()) => SearchStatus::Completed,
        Err(e) if e.is_cancelled() => SearchStatus::TimedOut,
        Err(e) => return Err(e),
    };

    Ok(SearchReport {
        matches,
        status,
        files_scanned,
        elapsed: Duration::ZERO,
    })
}
