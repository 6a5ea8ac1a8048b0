use super::{SearchObserver, SearchReport, SearchStatus};
use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::entry::Entry;
use crate::error::{Result, RfseekError};
use crate::filter::EntryFilter;
use crate::matcher::Matcher;
use crate::walker::walk_tree;
use crossbeam_channel::{Receiver, Sender, bounded, select};
use log::debug;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Per-worker slack in the work and result queues.
const QUEUE_DEPTH_PER_WORKER: usize = 2;

/// Counters shared by the worker pool.
#[derive(Default)]
struct PoolState {
    files_scanned: AtomicUsize,
    interrupted: AtomicBool,
}

/// Producer -> worker pool -> collector.
///
/// The producer walks the tree and feeds a bounded work queue. Each worker
/// owns a clone of the result sender, so the result channel disconnects only
/// after the last worker has returned; the collector (this thread) therefore
/// sees every late result and always terminates. All threads are joined
/// before returning.
pub(super) fn run(
    config: &SearchConfig,
    filter: &dyn EntryFilter,
    matcher: &dyn Matcher,
    cancel: CancelToken,
    observer: &dyn SearchObserver,
) -> Result<SearchReport> {
    let capacity = config.workers * QUEUE_DEPTH_PER_WORKER;
    let (work_tx, work_rx) = bounded::<Entry>(capacity);
    let (result_tx, result_rx) = bounded::<Entry>(capacity);

    let matches = Mutex::new(Vec::new());
    let state = PoolState::default();

    let walked = thread::scope(|scope| {
        let producer = scope.spawn(move || produce(config, filter, cancel, work_tx));

        let workers: Vec<_> = (0..config.workers)
            .map(|id| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let state = &state;
                scope.spawn(move || {
                    work(id, matcher, cancel, work_rx, result_tx, observer, state)
                })
            })
            .collect();

        // Only the workers may keep the channels alive from here on.
        drop(work_rx);
        drop(result_tx);

        for entry in result_rx.iter() {
            observer.on_match(&entry);
            matches.lock().push(entry);
        }

        for handle in workers {
            if handle.join().is_err() {
                return Err(RfseekError::Other("search worker panicked".to_string()));
            }
        }

        producer
            .join()
            .map_err(|_| RfseekError::Other("directory walker panicked".to_string()))?
    });

    let status = match walked {
        Ok(()) if !state.interrupted.load(Ordering::Relaxed) => SearchStatus::Completed,
        Ok(()) => SearchStatus::TimedOut,
        Err(e) if e.is_cancelled() => SearchStatus::TimedOut,
        Err(e) => return Err(e),
    };

    Ok(SearchReport {
        matches: matches.into_inner(),
        status,
        files_scanned: state.files_scanned.into_inner(),
        elapsed: Duration::ZERO,
    })
}

/// Walks the tree and queues surviving files. Dropping `work_tx` on return
/// tells the workers that no more work is coming.
fn produce(
    config: &SearchConfig,
    filter: &dyn EntryFilter,
    cancel: CancelToken,
    work_tx: Sender<Entry>,
) -> Result<()> {
    let deadline = cancel.fired();
    walk_tree(config, filter, &cancel, |entry| {
        select! {
            // Workers only hang up once the deadline has fired.
            send(work_tx, entry) -> sent => sent.map_err(|_| {
                if cancel.is_cancelled() {
                    RfseekError::Cancelled
                } else {
                    RfseekError::Other("no search workers left to accept files".to_string())
                }
            }),
            recv(deadline) -> _ => Err(RfseekError::Cancelled),
        }
    })
}

fn work(
    id: usize,
    matcher: &dyn Matcher,
    cancel: CancelToken,
    work_rx: Receiver<Entry>,
    result_tx: Sender<Entry>,
    observer: &dyn SearchObserver,
    state: &PoolState,
) {
    let deadline = cancel.fired();

    loop {
        let entry = select! {
            recv(work_rx) -> msg => match msg {
                Ok(entry) => entry,
                Err(_) => break,
            },
            recv(deadline) -> _ => {
                state.interrupted.store(true, Ordering::Relaxed);
                break;
            }
        };

        if cancel.is_cancelled() {
            state.interrupted.store(true, Ordering::Relaxed);
            break;
        }

        state.files_scanned.fetch_add(1, Ordering::Relaxed);
        observer.on_entry(&entry);

        match matcher.matches(&cancel, &entry.path) {
            Ok(true) => {
                if result_tx.send(entry).is_err() {
                    break;
                }
            }
            Ok(false) => {}
            Err(e) if e.is_cancelled() => {
                state.interrupted.store(true, Ordering::Relaxed);
                break;
            }
            Err(e) => debug!("Worker {id}: skipping {}: {e}", entry.path.display()),
        }
    }

    debug!("Worker {id} exiting");
}
