use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::client::Fetch;
use crate::dispatcher::dispatch;
use crate::error::AppResult;
use crate::model::Config;
use crate::pool::WorkerPool;
use crate::queue::work_queue;
use crate::shutdown::ShutdownSender;
use crate::summary::{collect, Summary};

/// Everything one run needs, built once by the entry point.
pub struct RunContext<F: Fetch + ?Sized> {
    pub config: Config,
    pub fetcher: Arc<F>,
    pub shutdown_tx: ShutdownSender,
    pub progress: ProgressBar,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub target: String,
    pub concurrency: usize,
    pub started_at: DateTime<Utc>,
    pub dispatched: usize,
    #[serde(rename = "elapsed_secs", serialize_with = "ser_secs")]
    pub elapsed: Duration,
    #[serde(flatten)]
    pub summary: Summary,
}

impl RunReport {
    pub fn requests_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.summary.total as f64 / secs
        } else {
            0.0
        }
    }
}

fn ser_secs<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(value.as_secs_f64())
}

pub async fn run<F: Fetch + ?Sized>(ctx: RunContext<F>) -> AppResult<RunReport> {
    let RunContext {
        config,
        fetcher,
        shutdown_tx,
        progress,
    } = ctx;
    let started_at = Utc::now();
    let begin = Instant::now();

    let (queue, queue_rx) = work_queue(config.queue_capacity());
    let (tx, rx) = mpsc::channel(config.queue_capacity());
    let aggregator = tokio::spawn(collect(rx, progress));

    let pool = WorkerPool::spawn(config.concurrency, &queue_rx, &fetcher, &tx, &shutdown_tx);
    // workers own the only remaining handles, so the queue and the outcome
    // channel both close once the last worker exits
    drop(queue_rx);
    drop(tx);
    info!(workers = pool.started(), "workers started");

    let dispatched = dispatch(
        queue,
        Arc::clone(&config.target),
        config.total_requests,
        shutdown_tx.subscribe(),
    )
    .await;
    let reports = pool.join().await;
    let summary = aggregator.await?;
    let dispatched = dispatched?;

    info!(
        workers = reports.len(),
        dispatched,
        processed = reports.iter().map(|r| r.processed).sum::<usize>(),
        "all workers finished"
    );

    Ok(RunReport {
        target: config.target.to_string(),
        concurrency: config.concurrency,
        started_at,
        dispatched,
        elapsed: begin.elapsed(),
        summary,
    })
}
