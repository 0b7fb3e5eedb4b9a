mod http;
mod local;
mod memory;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use memory::MemoryReader;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for fetching inclusive byte ranges from a data source
///
/// The source is assumed to be static for as long as the value is alive.
/// If the underlying resource changes between two fetches, whatever is
/// decoded from the combined bytes is undefined.
#[async_trait]
pub trait RangeFetch: Send + Sync {
    /// Fetch the bytes `start..=end`.
    ///
    /// An `end` past the last byte is clamped to it, so the returned buffer
    /// may be shorter than requested. A `start` at or past the end of the
    /// source is an error.
    async fn fetch_range(&self, start: u64, end: u64) -> Result<Vec<u8>>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

/// Clamp an inclusive range against a source of `size` bytes.
///
/// Returns the clamped end, or an error for an unsatisfiable range.
pub(crate) fn clamp_range(start: u64, end: u64, size: u64) -> Result<u64> {
    if end < start {
        anyhow::bail!("Invalid byte range {}-{}", start, end);
    }
    if start >= size {
        anyhow::bail!(
            "Byte range {}-{} not satisfiable for {} byte source",
            start,
            end,
            size
        );
    }
    Ok(end.min(size - 1))
}
