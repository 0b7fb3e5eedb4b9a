//! Error types produced while reading a ranged ZIP archive.

use thiserror::Error;

/// Result type with [`ZipError`] as its error variant
pub type ZipResult<T> = Result<T, ZipError>;

/// Broad class of a [`ZipError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The byte source failed to deliver a range
    Resource,
    /// The archive bytes are not a consistent ZIP archive
    Format,
    /// The archive is fine but the request made of it cannot be satisfied
    Usage,
}

/// Error type for ranged ZIP reading
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZipError {
    #[error("failed to fetch bytes {start}-{end}")]
    Fetch {
        start: u64,
        end: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("no EOCD signature found in the last {window} bytes")]
    EocdNotFound { window: u64 },

    #[error(
        "invalid {record} signature at offset {offset}: expected 0x{expected:08x}, got 0x{actual:08x}"
    )]
    InvalidSignature {
        record: &'static str,
        offset: u64,
        expected: u32,
        actual: u32,
    },

    #[error("truncated {record} at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        record: &'static str,
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error(
        "central directory ({offset} + {size} bytes) extends past the end of a {archive_size} byte archive"
    )]
    DirectoryOutOfBounds {
        offset: u32,
        size: u32,
        archive_size: u64,
    },

    #[error("entry {name:?} points at offset {offset}, past the end of a {archive_size} byte archive")]
    EntryOutOfBounds {
        name: String,
        offset: u32,
        archive_size: u64,
    },

    #[error("entry name at offset {offset} is not valid UTF-8")]
    InvalidName {
        offset: u64,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error(
        "local header of {name:?} does not match the central directory: sizes {local_compressed}/{local_uncompressed}, expected {compressed}/{uncompressed}"
    )]
    SizeMismatch {
        name: String,
        compressed: u32,
        uncompressed: u32,
        local_compressed: u32,
        local_uncompressed: u32,
    },

    #[error("no elements to fetch: the archive is empty")]
    EmptyArchive,

    #[error("no files retrieved from the central directory")]
    EmptyFileList,

    #[error("invalid selection {index}: expected a number between 1 and {count}")]
    InvalidSelection { index: usize, count: usize },
}

impl ZipError {
    pub(crate) fn fetch(start: u64, end: u64, err: anyhow::Error) -> Self {
        ZipError::Fetch {
            start,
            end,
            source: err.into(),
        }
    }

    /// Classify the error as a resource, format or usage failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            ZipError::Fetch { .. } => ErrorCategory::Resource,
            ZipError::EmptyArchive
            | ZipError::EmptyFileList
            | ZipError::InvalidSelection { .. } => ErrorCategory::Usage,
            _ => ErrorCategory::Format,
        }
    }
}
