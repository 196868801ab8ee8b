use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Single-page HTTP fetcher. The timeout covers the whole request, body included.
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Fetcher { client, timeout })
    }

    /// GET `url` and decode the body as UTF-8, replacing invalid sequences.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        info!(url = %url, "Fetching page");
        let start = Instant::now();

        let result = self.get(url).await;
        if let Err(e) = &result {
            warn!(url = %url, error = %e, "Fetch failed");
        }
        let bytes = result?;

        debug!(
            url = %url,
            bytes = bytes.len(),
            latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Fetched page"
        );
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err)
        }
    }
}
