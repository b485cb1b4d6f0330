use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_TOTAL_REQUESTS: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one run, validated once and then only read.
#[derive(Clone, Debug)]
pub struct Config {
    pub target: Arc<Url>,
    pub total_requests: usize,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        target: &str,
        total_requests: usize,
        concurrency: usize,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            target: Arc::new(parse_target(target)?),
            total_requests,
            concurrency,
            timeout,
        })
    }

    /// Queue depth: half again the worker count, never zero.
    pub fn queue_capacity(&self) -> usize {
        queue_capacity(self.concurrency)
    }
}

pub fn queue_capacity(concurrency: usize) -> usize {
    concurrency.saturating_add(concurrency / 2).max(1)
}

pub fn parse_target(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
    Ok(url)
}

/// One request to perform. `seq` is the dispatch order, starting at 0.
#[derive(Clone, Debug)]
pub struct WorkItem {
    pub seq: usize,
    pub target: Arc<Url>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Connect,
    Redirect,
    Request,
    Cancelled,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Redirect => "redirect",
            FailureKind::Request => "request",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success(u16),
    Failure(FailureKind),
}

#[derive(Clone, Debug)]
pub struct RequestOutcome {
    pub worker: usize,
    pub seq: usize,
    pub status: OutcomeStatus,
    pub latency: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_capacity_is_one_and_a_half_times_concurrency() {
        assert_eq!(queue_capacity(10), 15);
        assert_eq!(queue_capacity(1), 1);
        assert_eq!(queue_capacity(3), 4);
        assert_eq!(queue_capacity(0), 1);
    }

    #[test]
    fn accepts_absolute_http_urls() {
        let config = Config::new("http://localhost:8080/ping", 5, 2, Duration::from_secs(1));
        let config = config.unwrap();
        assert_eq!(config.target.as_str(), "http://localhost:8080/ping");
        assert_eq!(config.total_requests, 5);
        assert_eq!(config.queue_capacity(), 3);
    }

    #[test]
    fn allows_zero_requests() {
        assert!(Config::new("https://example.com", 0, 1, Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn rejects_malformed_targets() {
        assert_eq!(parse_target(""), Err(ConfigError::EmptyUrl));
        assert_eq!(parse_target("   "), Err(ConfigError::EmptyUrl));
        assert!(matches!(
            parse_target("example.com/path"),
            Err(ConfigError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))
        ));
        assert_eq!(
            parse_target("ftp://example.com"),
            Err(ConfigError::UnsupportedScheme("ftp".to_owned()))
        );
    }

    #[test]
    fn rejects_zero_concurrency_and_timeout() {
        assert_eq!(
            Config::new("http://a.test", 1, 0, Duration::from_secs(1)).err(),
            Some(ConfigError::ZeroConcurrency)
        );
        assert_eq!(
            Config::new("http://a.test", 1, 1, Duration::ZERO).err(),
            Some(ConfigError::ZeroTimeout)
        );
    }
}
