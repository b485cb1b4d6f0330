use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::debug;

use crate::client::Fetch;
use crate::model::{FailureKind, OutcomeStatus, RequestOutcome, WorkItem};
use crate::queue::WorkReceiver;
use crate::shutdown::{self, ShutdownReceiver};

/// What a worker reports when it terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub processed: usize,
}

pub async fn worker<F: Fetch + ?Sized>(
    id: usize,
    queue: WorkReceiver,
    fetcher: Arc<F>,
    tx: mpsc::Sender<RequestOutcome>,
    mut shutdown_rx: ShutdownReceiver,
) -> WorkerReport {
    let mut processed = 0;
    let mut cancelled = false;
    debug!(worker = id, "worker started");

    loop {
        let item = if cancelled {
            queue.dequeue().await
        } else {
            tokio::select! {
                biased;
                _ = shutdown::wait(&mut shutdown_rx) => {
                    cancelled = true;
                    continue;
                }
                item = queue.dequeue() => item,
            }
        };
        let Some(item) = item else {
            break;
        };
        processed += 1;

        let outcome = if cancelled {
            abandoned(id, &item)
        } else {
            tokio::select! {
                biased;
                _ = shutdown::wait(&mut shutdown_rx) => {
                    cancelled = true;
                    abandoned(id, &item)
                }
                outcome = execute(id, &item, fetcher.as_ref()) => outcome,
            }
        };

        if tx.send(outcome).await.is_err() {
            debug!(worker = id, "outcome receiver gone");
        }
    }

    debug!(worker = id, processed, "worker finished");
    WorkerReport { id, processed }
}

async fn execute<F: Fetch + ?Sized>(
    worker: usize,
    item: &WorkItem,
    fetcher: &F,
) -> RequestOutcome {
    let start = Instant::now();
    let status = match fetcher.fetch(&item.target).await {
        Ok(code) => OutcomeStatus::Success(code),
        Err(kind) => {
            debug!(worker, seq = item.seq, "request failed: {}", kind.as_str());
            OutcomeStatus::Failure(kind)
        }
    };
    RequestOutcome {
        worker,
        seq: item.seq,
        status,
        latency: start.elapsed(),
    }
}

fn abandoned(worker: usize, item: &WorkItem) -> RequestOutcome {
    RequestOutcome {
        worker,
        seq: item.seq,
        status: OutcomeStatus::Failure(FailureKind::Cancelled),
        latency: std::time::Duration::ZERO,
    }
}
