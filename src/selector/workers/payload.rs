use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use lazypick_source_api::{ItemId, Payload, SelectorSource, SourceError};

/// Commands sent to the payload worker pool.
#[derive(Debug)]
pub(crate) enum PayloadCommand {
    /// Fetch the payload for one item.
    Fetch {
        /// Cache epoch the request was made under.
        epoch: u64,
        id: ItemId,
    },
    /// Stop one worker thread.
    Shutdown,
}

/// Results sent back from the payload workers.
#[derive(Debug)]
pub(crate) struct PayloadResponse {
    pub(crate) epoch: u64,
    pub(crate) id: ItemId,
    pub(crate) result: Result<Option<Payload>, SourceError>,
}

/// Spawns `workers` threads sharing one command queue.
pub(crate) fn spawn(
    source: Arc<dyn SelectorSource>,
    workers: usize,
) -> (Sender<PayloadCommand>, Receiver<PayloadResponse>) {
    let (command_tx, command_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let command_rx = Arc::new(Mutex::new(command_rx));

    for index in 0..workers.max(1) {
        let source = Arc::clone(&source);
        let command_rx = Arc::clone(&command_rx);
        let result_tx = result_tx.clone();
        thread::Builder::new()
            .name(format!("payload-worker-{index}"))
            .spawn(move || worker_loop(source.as_ref(), &command_rx, &result_tx))
            .expect("failed to spawn payload worker thread");
    }

    (command_tx, result_rx)
}

fn worker_loop(
    source: &dyn SelectorSource,
    command_rx: &Mutex<Receiver<PayloadCommand>>,
    result_tx: &Sender<PayloadResponse>,
) {
    loop {
        // Hold the lock only while waiting so other workers can fetch in parallel.
        let command = match command_rx.lock() {
            Ok(receiver) => receiver.recv(),
            Err(_) => break,
        };
        match command {
            Ok(PayloadCommand::Fetch { epoch, id }) => {
                let result = source.fetch_payload(&id);
                if result_tx.send(PayloadResponse { epoch, id, result }).is_err() {
                    break;
                }
            }
            Ok(PayloadCommand::Shutdown) | Err(_) => break,
        }
    }
}

/// The selector's handle on the payload workers.
pub(crate) struct PayloadRuntime {
    tx: Sender<PayloadCommand>,
    rx: Receiver<PayloadResponse>,
    workers: usize,
}

impl PayloadRuntime {
    pub(crate) fn new(
        tx: Sender<PayloadCommand>,
        rx: Receiver<PayloadResponse>,
        workers: usize,
    ) -> Self {
        Self { tx, rx, workers }
    }

    pub(crate) fn spawn(source: Arc<dyn SelectorSource>, workers: usize) -> Self {
        let workers = workers.max(1);
        let (tx, rx) = spawn(source, workers);
        Self::new(tx, rx, workers)
    }

    /// Queue a fetch. Returns `false` if the workers are gone.
    pub(crate) fn fetch(&self, epoch: u64, id: ItemId) -> bool {
        self.tx.send(PayloadCommand::Fetch { epoch, id }).is_ok()
    }

    pub(crate) fn try_recv(&self) -> Result<PayloadResponse, TryRecvError> {
        self.rx.try_recv()
    }

    pub(crate) fn shutdown(&self) {
        for _ in 0..self.workers {
            let _ = self.tx.send(PayloadCommand::Shutdown);
        }
    }
}

impl Drop for PayloadRuntime {
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
    fn pool_answers_every_fetch() {
        let catalog = MemoryCatalog::from_entries(
            (0..8).map(|index| {
                (
                    ResultItem::new(format!("id-{index}"), format!("item {index}")),
                    Some(Payload::image(index, index)),
                )
            }),
        );
        let runtime = PayloadRuntime::spawn(Arc::new(catalog), 3);
        for index in 0..8 {
            assert!(runtime.fetch(0, ItemId::from(format!("id-{index}"))));
        }

        let mut seen = Vec::new();
        for _ in 0..8 {
            let response = runtime
                .rx
                .recv_timeout(Duration::from_secs(5))
                .expect("response");
            assert!(response.result.expect("payload").is_some());
            seen.push(response.id);
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }
}
