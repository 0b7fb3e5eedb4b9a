use anyhow::Result;
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use super::{RangeFetch, clamp_range};

/// In-memory range source
///
/// Stands in for a remote archive when embedding the reader or testing it.
/// Every requested range is recorded, so callers can check how much of the
/// archive a given operation touched.
pub struct MemoryReader {
    data: Vec<u8>,
    requests: Mutex<Vec<RangeInclusive<u64>>>,
}

impl MemoryReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Ranges requested so far, as passed to `fetch_range` (before clamping)
    pub fn requests(&self) -> Vec<RangeInclusive<u64>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Forget all recorded requests
    pub fn clear_requests(&self) {
        match self.requests.lock() {
            Ok(mut r) => r.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

#[async_trait]
impl RangeFetch for MemoryReader {
    async fn fetch_range(&self, start: u64, end: u64) -> Result<Vec<u8>> {
        match self.requests.lock() {
            Ok(mut r) => r.push(start..=end),
            Err(poisoned) => poisoned.into_inner().push(start..=end),
        }

        let end = clamp_range(start, end, self.size())?;
        Ok(self.data[start as usize..=end as usize].to_vec())
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
