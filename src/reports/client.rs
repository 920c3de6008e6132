// src/reports/client.rs
use std::future::Future;
use std::time::Duration;

use reqwest::header;

use crate::reports::models::RawDocument;
use crate::utils::error::FetchError;

pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Retrieval seam: anything that can turn a URL into a raw report page.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RawDocument, FetchError>>;
}

/// reqwest-backed fetcher with a fixed per-request timeout.
pub struct ReportClient {
    client: reqwest::Client,
}

impl ReportClient {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for ReportClient {
    /// Downloads a report page. Any non-2xx status is an error.
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        tracing::info!("Fetching {}...", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url.to_string()));
            }
            return Err(FetchError::Http { status, url: url.to_string() });
        }

        let html = response.text().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!("Downloaded {} bytes from {}", html.len(), url);

        Ok(RawDocument { url: url.to_string(), html })
    }
}
