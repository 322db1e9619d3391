use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, StatsError};

/// Where node stats come from. Implementations return the raw feed body.
#[async_trait]
pub trait StatsFeed: Send + Sync {
    /// Human-readable location of the feed, used in errors and logs.
    fn source(&self) -> &str;

    async fn fetch_body(&self) -> Result<String>;
}

/// How often a failed fetch is attempted.
///
/// Only transport failures and 5xx answers are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests, including the first. Zero is treated as one.
    pub attempts: u32,
    /// Wait before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn with_retries(retries: u32, backoff: Duration) -> Self {
        Self {
            attempts: retries.saturating_add(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

/// Stats feed served over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpStatsFeed {
    http: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl HttpStatsFeed {
    pub fn new(url: impl Into<String>, opts: FeedOptions) -> Result<Self> {
        let url = url.into();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| StatsError::Network {
            url: url.clone(),
            source,
        })?;
        Ok(Self {
            http,
            url,
            retry: opts.retry,
        })
    }

    async fn fetch_once(&self) -> Result<String> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| self.network_error(source))?;

        let body = resp
            .bytes()
            .await
            .map_err(|source| self.network_error(source))?;

        String::from_utf8(body.to_vec()).map_err(|e| StatsError::DataFormat {
            url: self.url.clone(),
            reason: format!("body is not valid UTF-8: {e}"),
        })
    }

    fn network_error(&self, source: reqwest::Error) -> StatsError {
        StatsError::Network {
            url: self.url.clone(),
            source,
        }
    }
}

#[async_trait]
impl StatsFeed for HttpStatsFeed {
    fn source(&self) -> &str {
        &self.url
    }

    async fn fetch_body(&self) -> Result<String> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            tracing::info!(url = %self.url, attempt, "fetching node stats");
            match self.fetch_once().await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < attempts && err.is_transient() => {
                    let delay = self.retry.backoff * attempt;
                    tracing::warn!(
                        url = %self.url,
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "stats fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
