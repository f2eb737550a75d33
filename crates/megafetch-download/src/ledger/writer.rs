//! Single-writer ledger task.
//!
//! Workers send outcomes over a channel; one task applies them in arrival
//! order, so the read-merge-write cycle never races.

use std::path::PathBuf;

use megafetch_core::{FetchError, FetchResult, LedgerEntry, Outcome};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::LedgerStore;

const CHANNEL_CAPACITY: usize = 64;

/// Outcomes the writer persisted during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerCounts {
    pub succeeded: u64,
    pub failed: u64,
}

impl LedgerCounts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Sending side, cloned into every worker.
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<LedgerEntry>,
}

impl LedgerHandle {
    /// Queue an entry. Returns false if the writer has already stopped.
    pub async fn record(&self, entry: LedgerEntry) -> bool {
        let asset_id = entry.asset_id.clone();
        if self.tx.send(entry).await.is_err() {
            tracing::warn!(
                target: "megafetch.ledger",
                asset_id = %asset_id,
                "Ledger writer stopped, outcome not recorded"
            );
            return false;
        }
        true
    }
}

/// The running writer.
pub struct LedgerTask {
    path: PathBuf,
    handle: JoinHandle<FetchResult<LedgerCounts>>,
}

impl LedgerTask {
    /// Wait for the writer to drain and exit.
    ///
    /// The writer exits once every `LedgerHandle` is dropped, so drop them
    /// before awaiting this.
    pub async fn finish(self) -> FetchResult<LedgerCounts> {
        self.handle.await.map_err(|e| {
            FetchError::ledger_io(self.path.display(), format!("ledger writer died: {e}"))
        })?
    }
}

/// Spawn the writer. A failed write cancels `cancel` and ends the task.
pub fn spawn_writer(store: LedgerStore, cancel: CancellationToken) -> (LedgerHandle, LedgerTask) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let path = store.path().to_path_buf();
    let handle = tokio::spawn(run_writer(store, rx, cancel));
    (LedgerHandle { tx }, LedgerTask { path, handle })
}

async fn run_writer(
    store: LedgerStore,
    mut rx: mpsc::Receiver<LedgerEntry>,
    cancel: CancellationToken,
) -> FetchResult<LedgerCounts> {
    let mut counts = LedgerCounts::default();

    while let Some(entry) = rx.recv().await {
        if let Err(e) = store.record_outcome(&entry.asset_id, entry.outcome).await {
            tracing::error!(
                target: "megafetch.ledger",
                asset_id = %entry.asset_id,
                error = %e,
                "Ledger write failed, cancelling run"
            );
            cancel.cancel();
            return Err(e);
        }
        counts.record(entry.outcome);
        tracing::debug!(
            target: "megafetch.ledger",
            asset_id = %entry.asset_id,
            outcome = %entry.outcome,
            "Recorded outcome"
        );
    }

    Ok(counts)
}
