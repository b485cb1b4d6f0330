use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::model::WorkItem;
use crate::queue::WorkSender;
use crate::shutdown::{self, ShutdownReceiver};

/// Enqueues `total` items for `target`, then closes the queue. A shutdown
/// signal stops dispatch early; the queue is closed either way.
///
/// Returns how many items were enqueued.
pub async fn dispatch(
    mut queue: WorkSender,
    target: Arc<Url>,
    total: usize,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<usize> {
    let mut enqueued = 0;
    while enqueued < total {
        let item = WorkItem {
            seq: enqueued,
            target: Arc::clone(&target),
        };
        tokio::select! {
            biased;
            _ = shutdown::wait(&mut shutdown_rx) => {
                warn!("dispatch cancelled after {enqueued} of {total} requests");
                break;
            }
            res = queue.enqueue(item) => {
                if res.is_err() {
                    return Err(AppError::QueueClosed {
                        remaining: total - enqueued,
                    });
                }
                enqueued += 1;
            }
        }
    }
    queue.close();
    debug!(enqueued, "dispatch finished, queue closed");
    Ok(enqueued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::work_queue;
    use crate::shutdown::shutdown_channel;
    use std::time::Duration;

    fn target() -> Arc<Url> {
        Arc::new(Url::parse("http://dispatch.test/").unwrap())
    }

    #[tokio::test]
    async fn enqueues_exactly_total_items_in_order() {
        let (queue, rx) = work_queue(2);
        let shutdown_tx = shutdown_channel();
        let handle = tokio::spawn(dispatch(queue, target(), 7, shutdown_tx.subscribe()));

        let mut seqs = vec![];
        while let Some(item) = rx.dequeue().await {
            assert_eq!(item.target.as_str(), "http://dispatch.test/");
            seqs.push(item.seq);
        }
        assert_eq!(handle.await.unwrap().unwrap(), 7);
        assert_eq!(seqs, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn zero_requests_closes_queue_immediately() {
        let (queue, rx) = work_queue(1);
        let shutdown_tx = shutdown_channel();
        assert_eq!(dispatch(queue, target(), 0, shutdown_tx.subscribe()).await.unwrap(), 0);
        assert!(rx.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn fails_when_no_consumer_is_left() {
        let (queue, rx) = work_queue(1);
        drop(rx);
        let shutdown_tx = shutdown_channel();
        let err = dispatch(queue, target(), 3, shutdown_tx.subscribe())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::QueueClosed { remaining: 3 }));
    }

    #[tokio::test]
    async fn shutdown_stops_dispatch_and_closes_queue() {
        let (queue, rx) = work_queue(1);
        let shutdown_tx = shutdown_channel();
        let handle = tokio::spawn(dispatch(queue, target(), 1_000, shutdown_tx.subscribe()));

        // let it fill the queue and block
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();

        let enqueued = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(enqueued, 1);

        assert!(rx.dequeue().await.is_some());
        assert!(rx.dequeue().await.is_none());
    }
}
