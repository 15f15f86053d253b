use crate::error::{Result, ScrapeError};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, doubling from `initial_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub markup: String,
}

/// GETs pages with the shared client. Anything but `200 OK` is an error;
/// transient failures are retried with exponential backoff.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl PageFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<Page> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url, timeout).await {
                Ok(page) => {
                    debug!("{} -> {} ({} bytes)", url, page.status, page.markup.len());
                    return Ok(page);
                }
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        "Attempt {}/{} for {} failed: {}. Retrying in {:?}",
                        attempt, self.retry.max_attempts, url, e, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<Page> {
        debug!("GET {}", url);
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let markup = response.text().await?;
        Ok(Page { status, markup })
    }
}
