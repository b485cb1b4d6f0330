use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::model::FailureKind;

/// Issues one GET. Implementations are shared by every worker.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    /// Returns the status code of whatever response came back.
    async fn fetch(&self, target: &Url) -> Result<u16, FailureKind>;
}

/// Connection-pooling HTTP client with a per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lzrgun/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, target: &Url) -> Result<u16, FailureKind> {
        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| classify(&e))?;
        let status = response.status().as_u16();

        // drain so the connection goes back to the pool
        if let Err(e) = response.bytes().await {
            debug!("discarding body from {target} failed: {e}");
        }
        Ok(status)
    }
}

pub fn classify(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_connect() {
        FailureKind::Connect
    } else if err.is_redirect() {
        FailureKind::Redirect
    } else if err.is_request() {
        FailureKind::Request
    } else {
        FailureKind::Other
    }
}
