use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::model::WorkItem;

/// Returned by [`WorkSender::enqueue`] when nothing can consume the item any more.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed;

/// Bounded FIFO of work items. Workers share the receiving half; whichever
/// worker holds the lock when an item arrives takes it.
pub fn work_queue(capacity: usize) -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        WorkSender { tx: Some(tx) },
        WorkReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

pub struct WorkSender {
    tx: Option<mpsc::Sender<WorkItem>>,
}

impl WorkSender {
    /// Waits for room in the queue.
    pub async fn enqueue(&self, item: WorkItem) -> Result<(), QueueClosed> {
        let Some(tx) = &self.tx else {
            return Err(QueueClosed);
        };
        tx.send(item).await.map_err(|_| QueueClosed)
    }

    /// Marks the end of work. Items already queued are still delivered.
    pub fn close(&mut self) {
        self.tx.take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

#[derive(Clone)]
pub struct WorkReceiver {
    rx: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
}

impl WorkReceiver {
    /// `None` once the queue is closed and drained.
    pub async fn dequeue(&self) -> Option<WorkItem> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}
