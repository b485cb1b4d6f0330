use thiserror::Error;

/// Rejections raised while turning user input into a [`crate::model::Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing target URL")]
    EmptyUrl,
    #[error("Error parsing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("timeout must be at least 1 second")]
    ZeroTimeout,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("work queue closed with {remaining} items left to dispatch")]
    QueueClosed { remaining: usize },
    #[error("outcome aggregator failed: {0}")]
    Aggregator(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
