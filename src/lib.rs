//! # zipslice
//!
//! Fetch a single member out of a remote ZIP archive using HTTP Range requests.
//!
//! The archive is never downloaded in full. Listing reads the archive's tail
//! and its central directory; extracting one entry reads that entry's local
//! header and its payload. Payloads are returned exactly as stored, so a
//! deflated entry comes back deflated.
//!
//! The reader works against anything implementing [`RangeFetch`]:
//! [`HttpRangeReader`] for URLs, [`LocalFileReader`] for files on disk and
//! [`MemoryReader`] for byte buffers.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use zipslice::{HttpRangeReader, ZipExtractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let url = "https://example.com/archive.zip".to_string();
//!     let reader = Arc::new(HttpRangeReader::new(url, Duration::from_secs(30)).await?);
//!     let extractor = ZipExtractor::new(reader);
//!
//!     let files = extractor.list_files().await?;
//!     for (idx, file) in files.iter().enumerate() {
//!         println!("{}: {} {}", idx + 1, file.name, file.uncompressed_size);
//!     }
//!
//!     let raw = extractor.extract_to_memory(files.select(1)?).await?;
//!     println!("{} compressed bytes", raw.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, RangeFetch};
pub use zip::{
    CompressionMethod, EntryDescriptor, EocdRecord, ErrorCategory, FileList, ZipError, ZipExtractor,
    ZipResult,
};
