use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

pub fn shutdown_channel() -> ShutdownSender {
    let (tx, _) = broadcast::channel(1);
    tx
}

/// Resolves on the first signal. Once every sender is gone nobody can cancel
/// any more, so this never resolves.
pub async fn wait(rx: &mut ShutdownReceiver) {
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => std::future::pending().await,
    }
}
