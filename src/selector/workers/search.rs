use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use lazypick_source_api::{ResultPage, SearchCriteria, SelectorSource, SourceError};

use crate::selector::pages::PageRequest;

/// Commands understood by the background search worker.
#[derive(Debug)]
pub(crate) enum SearchCommand {
    /// Fetch one page of results.
    Query {
        /// Generation of the effective query this page belongs to.
        generation: u64,
        criteria: SearchCriteria,
        offset: usize,
        limit: usize,
    },
    /// Stop the background worker thread.
    Shutdown,
}

/// A page (or failure) sent back to the selector.
#[derive(Debug)]
pub(crate) struct SearchResponse {
    /// Identifier matching the [`SearchCommand::Query`] that produced the result.
    pub(crate) generation: u64,
    pub(crate) offset: usize,
    pub(crate) result: Result<ResultPage, SourceError>,
}

/// Launches the background search worker thread and returns communication channels.
pub(crate) fn spawn(
    source: Arc<dyn SelectorSource>,
) -> (Sender<SearchCommand>, Receiver<SearchResponse>, Arc<AtomicU64>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let latest_generation = Arc::new(AtomicU64::new(0));
    let thread_latest = Arc::clone(&latest_generation);

    thread::Builder::new()
        .name("search-worker".into())
        .spawn(move || worker_loop(source.as_ref(), command_rx, result_tx, thread_latest))
        .expect("failed to spawn search worker thread");

    (command_tx, result_rx, latest_generation)
}

fn worker_loop(
    source: &dyn SelectorSource,
    command_rx: Receiver<SearchCommand>,
    result_tx: Sender<SearchResponse>,
    latest_generation: Arc<AtomicU64>,
) {
    while let Ok(command) = command_rx.recv() {
        match command {
            SearchCommand::Query {
                generation,
                criteria,
                offset,
                limit,
            } => {
                // A newer query was issued while this one sat in the queue.
                if is_stale(generation, &latest_generation) {
                    tracing::trace!(generation, offset, "skipping stale search");
                    continue;
                }
                let result = source.search(&criteria, limit, offset);
                let response = SearchResponse {
                    generation,
                    offset,
                    result,
                };
                if result_tx.send(response).is_err() {
                    break;
                }
            }
            SearchCommand::Shutdown => break,
        }
    }
}

fn is_stale(generation: u64, latest_generation: &AtomicU64) -> bool {
    latest_generation.load(AtomicOrdering::Acquire) != generation
}

/// The selector's handle on the search worker.
pub(crate) struct SearchRuntime {
    tx: Sender<SearchCommand>,
    rx: Receiver<SearchResponse>,
    latest_generation: Arc<AtomicU64>,
}

impl SearchRuntime {
    pub(crate) fn new(
        tx: Sender<SearchCommand>,
        rx: Receiver<SearchResponse>,
        latest_generation: Arc<AtomicU64>,
    ) -> Self {
        Self {
            tx,
            rx,
            latest_generation,
        }
    }

    /// Spawn a worker searching `source`.
    pub(crate) fn spawn(source: Arc<dyn SelectorSource>) -> Self {
        let (tx, rx, latest_generation) = spawn(source);
        Self::new(tx, rx, latest_generation)
    }

    /// Publish the request's generation as the latest and queue it.
    ///
    /// Returns `false` if the worker is gone.
    pub(crate) fn issue(&self, request: PageRequest) -> bool {
        self.latest_generation
            .store(request.generation, AtomicOrdering::Release);
        self.tx
            .send(SearchCommand::Query {
                generation: request.generation,
                criteria: request.criteria,
                offset: request.offset,
                limit: request.limit,
            })
            .is_ok()
    }

    /// Mark every queued command as stale without issuing a new one.
    pub(crate) fn retire(&self, generation: u64) {
        self.latest_generation
            .store(generation, AtomicOrdering::Release);
    }

    pub(crate) fn try_recv(&self) -> Result<SearchResponse, TryRecvError> {
        self.rx.try_recv()
    }

    pub(crate) fn shutdown(&self) {
        let _ = self.tx.send(SearchCommand::Shutdown);
    }
}

impl Drop for SearchRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lazypick_source_api::{MemoryCatalog, ResultItem};

    use super::*;

    #[test]
    fn worker_answers_with_request_generation() {
        let catalog = MemoryCatalog::from_items([ResultItem::new("a", "alpha")]);
        let runtime = SearchRuntime::spawn(Arc::new(catalog));
        assert!(runtime.issue(PageRequest {
            generation: 7,
            criteria: SearchCriteria::new(""),
            offset: 0,
            limit: 5,
        }));

        let response = runtime
            .rx
            .recv_timeout(Duration::from_secs(5))
            .expect("response");
        assert_eq!(response.generation, 7);
        assert_eq!(response.result.expect("page").items.len(), 1);
    }

    #[test]
    fn shutdown_command_stops_worker() {
        let catalog = MemoryCatalog::from_items([]);
        let runtime = SearchRuntime::spawn(Arc::new(catalog));
        runtime.shutdown();
        let disconnected = runtime.rx.recv_timeout(Duration::from_secs(5));
        assert!(matches!(disconnected, Err(mpsc::RecvTimeoutError::Disconnected)));
    }
}
