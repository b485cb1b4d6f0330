use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::client::Fetch;
use crate::model::RequestOutcome;
use crate::queue::WorkReceiver;
use crate::shutdown::ShutdownSender;
use crate::worker::{worker, WorkerReport};

/// A fixed set of worker tasks draining one queue.
///
/// [`WorkerPool::join`] is the completion barrier: it returns only after
/// every spawned worker has returned, panicked workers included.
pub struct WorkerPool {
    set: JoinSet<WorkerReport>,
    started: usize,
}

impl WorkerPool {
    pub fn spawn<F: Fetch + ?Sized>(
        concurrency: usize,
        queue: &WorkReceiver,
        fetcher: &Arc<F>,
        tx: &mpsc::Sender<RequestOutcome>,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        let mut set = JoinSet::new();
        for id in 0..concurrency {
            // subscribe before spawning so an early signal is not missed
            set.spawn(worker(
                id,
                queue.clone(),
                Arc::clone(fetcher),
                tx.clone(),
                shutdown_tx.subscribe(),
            ));
        }
        debug!(workers = concurrency, "worker pool started");
        Self {
            set,
            started: concurrency,
        }
    }

    pub fn started(&self) -> usize {
        self.started
    }

    pub async fn join(mut self) -> Vec<WorkerReport> {
        let mut reports = Vec::with_capacity(self.started);
        while let Some(res) = self.set.join_next().await {
            match res {
                Ok(report) => reports.push(report),
                Err(e) => error!("worker task failed: {e}"),
            }
        }
        reports.sort_by_key(|r| r.id);
        reports
    }
}
