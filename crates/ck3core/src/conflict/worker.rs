//! Background analysis handoff.
//!
//! Conflict checks re-run on every enable toggle, and large playsets take a
//! while to scan, so the shell must not run them on its own thread. Requests
//! are queued to a worker thread and finished reports come back on a channel.
//!
//! Each request gets a monotonically increasing ticket. A report whose ticket
//! is no longer the newest issued is dropped at delivery time: a superseded
//! scan still runs to completion (its cache fills stay useful) but can never
//! clobber a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use crate::conflict::{ConflictAnalyzer, ConflictReport};
use crate::modinfo::ModEntry;

/// A finished analysis, tagged with the ticket it was requested under.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub ticket: u64,
    pub report: ConflictReport,
}

struct Request {
    ticket: u64,
    mods: Vec<ModEntry>,
}

/// Handle for submitting analysis requests to the worker thread.
///
/// Dropping the handle closes the request channel and the worker exits after
/// finishing whatever it was computing.
pub struct AnalysisWorker {
    analyzer: Arc<ConflictAnalyzer>,
    latest: Arc<AtomicU64>,
    requests: mpsc::Sender<Request>,
}

impl AnalysisWorker {
    /// Spawn the worker thread. Returns the submit handle and the channel
    /// completed reports arrive on.
    pub fn spawn(analyzer: Arc<ConflictAnalyzer>) -> (Self, mpsc::Receiver<AnalysisOutcome>) {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (out_tx, out_rx) = mpsc::channel();
        let latest = Arc::new(AtomicU64::new(0));

        let thread_analyzer = Arc::clone(&analyzer);
        let thread_latest = Arc::clone(&latest);
        std::thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                let report = thread_analyzer.analyze(&request.mods);

                if thread_latest.load(Ordering::SeqCst) != request.ticket {
                    tracing::debug!(ticket = request.ticket, "dropping superseded analysis");
                    continue;
                }

                let outcome = AnalysisOutcome {
                    ticket: request.ticket,
                    report,
                };
                if out_tx.send(outcome).is_err() {
                    break; // Receiver dropped
                }
            }
        });

        let worker = AnalysisWorker {
            analyzer,
            latest,
            requests: req_tx,
        };
        (worker, out_rx)
    }

    /// Queue an analysis of `mods`. Returns the ticket its outcome will
    /// carry; any outcome with an older ticket is already superseded.
    pub fn request(&self, mods: Vec<ModEntry>) -> u64 {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        // A send error means the worker thread is gone; the outcome channel
        // surfaces that to the caller as a disconnect.
        let _ = self.requests.send(Request { ticket, mods });
        ticket
    }

    /// The analyzer shared with the worker thread, cache included.
    pub fn analyzer(&self) -> &Arc<ConflictAnalyzer> {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dir_mod(root: &std::path::Path, id: &str, name: &str, file: &str) -> ModEntry {
        let dir = root.join(id);
        let path = dir.join(file);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"content").unwrap();
        ModEntry::new(id).with_display_name(name).with_dir_path(dir)
    }

    #[test]
    fn test_report_arrives_on_channel() {
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_mod(tmp.path(), "a", "A", "gui/x.gui");
        let b = dir_mod(tmp.path(), "b", "B", "gui/x.gui");

        let (worker, outcomes) = AnalysisWorker::spawn(Arc::new(ConflictAnalyzer::new()));
        let ticket = worker.request(vec![a, b]);

        let outcome = outcomes.recv_timeout(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.report.conflicts["gui/x.gui"], vec!["A", "B"]);
    }

    #[test]
    fn test_latest_request_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_mod(tmp.path(), "a", "A", "gui/x.gui");
        let b = dir_mod(tmp.path(), "b", "B", "gui/x.gui");
        let c = dir_mod(tmp.path(), "c", "C", "events/e.txt");

        let (worker, outcomes) = AnalysisWorker::spawn(Arc::new(ConflictAnalyzer::new()));
        let first = worker.request(vec![a.clone(), b.clone()]);
        let second = worker.request(vec![a, b, c]);
        assert!(second > first);

        // The first outcome may or may not arrive depending on timing; the
        // newest ticket's outcome always does, and nothing newer follows it.
        let mut last = outcomes.recv_timeout(Duration::from_secs(10)).unwrap();
        while last.ticket != second {
            last = outcomes.recv_timeout(Duration::from_secs(10)).unwrap();
        }
        assert_eq!(last.report.conflicts["gui/x.gui"], vec!["A", "B"]);
    }

    #[test]
    fn test_worker_shares_the_analyzer_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let a = dir_mod(tmp.path(), "a", "A", "gui/x.gui");

        let analyzer = Arc::new(ConflictAnalyzer::new());
        let (worker, outcomes) = AnalysisWorker::spawn(Arc::clone(&analyzer));
        worker.request(vec![a.clone()]);
        outcomes.recv_timeout(Duration::from_secs(10)).unwrap();

        // The set computed on the worker thread is the cached one here.
        let cached = analyzer.file_set(&a);
        assert!(Arc::ptr_eq(&cached, &worker.analyzer().file_set(&a)));
    }
}
