use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use console::style;
use indicatif::ProgressBar;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::model::{FailureKind, OutcomeStatus, RequestOutcome};

/// Running totals over every recorded outcome.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub status_codes: BTreeMap<u16, usize>,
    pub failures: BTreeMap<FailureKind, usize>,
    #[serde(rename = "latency_min_ms", serialize_with = "ser_millis_opt")]
    pub latency_min: Option<Duration>,
    #[serde(rename = "latency_max_ms", serialize_with = "ser_millis_opt")]
    pub latency_max: Option<Duration>,
    #[serde(skip)]
    pub latency_sum: Duration,
}

impl Summary {
    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.total += 1;
        match outcome.status {
            OutcomeStatus::Success(code) => {
                self.succeeded += 1;
                *self.status_codes.entry(code).or_default() += 1;
            }
            OutcomeStatus::Failure(kind) => {
                self.failed += 1;
                *self.failures.entry(kind).or_default() += 1;
                // abandoned requests never ran, keep them out of the timings
                if kind == FailureKind::Cancelled {
                    return;
                }
            }
        }
        let latency = outcome.latency;
        self.latency_sum += latency;
        self.latency_min = Some(self.latency_min.map_or(latency, |m| m.min(latency)));
        self.latency_max = Some(self.latency_max.map_or(latency, |m| m.max(latency)));
    }

    pub fn latency_mean(&self) -> Option<Duration> {
        let cancelled = self.failures.get(&FailureKind::Cancelled).copied();
        let timed = self.total - cancelled.unwrap_or(0);
        u32::try_from(timed)
            .ok()
            .filter(|n| *n > 0)
            .map(|n| self.latency_sum / n)
    }
}

fn ser_millis_opt<S>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(d) => s.serialize_some(&(d.as_secs_f64() * 1000.0)),
        None => s.serialize_none(),
    }
}

fn millis(d: Option<Duration>) -> String {
    d.map_or_else(|| "-".to_owned(), |d| format!("{:.2}ms", d.as_secs_f64() * 1000.0))
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} requests: {} succeeded, {} failed",
            self.total,
            style(self.succeeded).green(),
            style(self.failed).red()
        )?;
        for (code, count) in &self.status_codes {
            writeln!(f, "  [{code}] {count} responses")?;
        }
        for (kind, count) in &self.failures {
            writeln!(f, "  [{}] {count} errors", kind.as_str())?;
        }
        write!(
            f,
            "latency min {} / mean {} / max {}",
            millis(self.latency_min),
            millis(self.latency_mean()),
            millis(self.latency_max)
        )
    }
}

/// Single aggregation point: drains `rx` until every worker has dropped its
/// sender.
pub async fn collect(mut rx: mpsc::Receiver<RequestOutcome>, pb: ProgressBar) -> Summary {
    let mut summary = Summary::default();
    while let Some(outcome) = rx.recv().await {
        summary.record(&outcome);
        pb.inc(1);
        if summary.failed > 0 {
            pb.set_message(format!("{} failed", summary.failed));
        }
    }
    pb.finish_and_clear();
    summary
}
