use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{RangeFetch, clamp_range};
use anyhow::{Context, Result, anyhow, bail};

/// HTTP Range reader for remote ZIP files
///
/// Every fetch is a single `GET` with a `Range` header. Failures are
/// returned as-is; nothing is retried.
pub struct HttpRangeReader {
    client: Client,
    url: String,
    size: u64,
    transferred_bytes: AtomicU64,
}

impl HttpRangeReader {
    /// Create a new HTTP Range reader
    ///
    /// This sends a HEAD request to learn the archive size
    pub async fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let resp = client
            .head(&url)
            .send()
            .await
            .with_context(|| format!("HEAD {} failed", url))?;

        if !resp.status().is_success() {
            bail!("HTTP request failed with status: {}", resp.status());
        }

        let accept_ranges = resp
            .headers()
            .get(header::ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");

        if !accept_ranges.contains("bytes") {
            // Plenty of servers honour Range without advertising it; the
            // status check on each GET catches the ones that don't.
            log::warn!("{} does not advertise byte range support", url);
        }

        let size = resp
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| anyhow!("Remote server did not return Content-Length"))?;

        log::info!("{} is {} bytes", url, size);

        Ok(Self {
            client,
            url,
            size,
            transferred_bytes: AtomicU64::new(0),
        })
    }

    /// Get total bytes transferred from network
    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RangeFetch for HttpRangeReader {
    async fn fetch_range(&self, start: u64, end: u64) -> Result<Vec<u8>> {
        let end = clamp_range(start, end, self.size)?;
        let range = format!("bytes={}-{}", start, end);
        log::debug!("GET {} Range: {}", self.url, range);

        let resp = self
            .client
            .get(&self.url)
            .header(header::RANGE, &range)
            .send()
            .await
            .with_context(|| format!("GET {} ({}) failed", self.url, range))?;

        if resp.status() != StatusCode::PARTIAL_CONTENT {
            bail!(
                "HTTP request for {} failed with status: {}",
                range,
                resp.status()
            );
        }

        let bytes = resp.bytes().await?;
        self.transferred_bytes
            .fetch_add(bytes.len() as u64, Ordering::Relaxed);

        let expected = (end - start + 1) as usize;
        if bytes.len() != expected {
            bail!(
                "Server returned {} bytes for {}, expected {}",
                bytes.len(),
                range,
                expected
            );
        }

        Ok(bytes.to_vec())
    }

    fn size(&self) -> u64 {
        self.size
    }
}
