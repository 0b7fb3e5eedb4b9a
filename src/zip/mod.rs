//! ZIP archive reading over byte ranges.
//!
//! ## Architecture
//!
//! - [`structures`]: record views (EOCD, central directory header, local
//!   header) and the decoded entry types
//! - [`parser`]: EOCD location and central directory decoding
//! - [`extractor`]: local header validation and payload fetch, plus the
//!   [`ZipExtractor`] convenience wrapper
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! Listing costs two range fetches (tail, directory) and extracting one
//! entry costs two more (local header, payload).
//!
//! ## Limitations
//!
//! - No ZIP64 or multi-disk archives
//! - Payloads are returned as stored; nothing is decompressed

mod error;
mod extractor;
mod parser;
mod structures;

pub use error::{ErrorCategory, ZipError, ZipResult};
pub use extractor::{ZipExtractor, extract};
pub use parser::{EOCD_SEARCH_WINDOW, locate, parse_central_directory, tail_start};
pub use structures::{CompressionMethod, EntryDescriptor, EocdRecord, FileList};
