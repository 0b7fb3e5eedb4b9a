use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::io::RangeFetch;
use anyhow::{Context, Result, bail};

use super::error::{ZipError, ZipResult};
use super::parser::{fetch, locate, parse_central_directory};
use super::structures::{EntryDescriptor, EocdRecord, FileList, LfhView};

/// Fetch the raw payload of one entry.
///
/// Reads the 30-byte local file header, checks it against the central
/// directory entry, then fetches exactly `compressed_size` bytes from
/// right after the header's name and extra fields. The bytes are returned
/// as stored in the archive; inflating them according to
/// `entry.compression_method` is up to the caller.
///
/// At most two ranges are fetched. An inconsistent local header is
/// reported before the payload is requested.
pub async fn extract<R: RangeFetch + ?Sized>(
    reader: &R,
    entry: &EntryDescriptor,
) -> ZipResult<Vec<u8>> {
    let archive_size = reader.size();
    let lfh_offset = entry.offset as u64;
    if lfh_offset >= archive_size {
        return Err(ZipError::EntryOutOfBounds {
            name: entry.name.clone(),
            offset: entry.offset,
            archive_size,
        });
    }

    let lfh_buf = fetch(reader, lfh_offset, lfh_offset + LfhView::SIZE as u64 - 1).await?;
    let lfh = LfhView::new(&lfh_buf, lfh_offset)?;

    if lfh.compressed_size() != entry.compressed_size
        || lfh.uncompressed_size() != entry.uncompressed_size
    {
        return Err(ZipError::SizeMismatch {
            name: entry.name.clone(),
            compressed: entry.compressed_size,
            uncompressed: entry.uncompressed_size,
            local_compressed: lfh.compressed_size(),
            local_uncompressed: lfh.uncompressed_size(),
        });
    }

    // Data starts after: LFH (30 bytes) + filename + extra field
    let data_offset = lfh_offset + LfhView::SIZE as u64 + lfh.name_length() + lfh.extra_length();

    if data_offset + entry.compressed_size as u64 > archive_size {
        return Err(ZipError::Truncated {
            record: "entry data",
            offset: data_offset,
            needed: entry.compressed_size as usize,
            available: archive_size.saturating_sub(data_offset) as usize,
        });
    }

    if entry.compressed_size == 0 {
        return Ok(Vec::new());
    }

    let data_end = data_offset + entry.compressed_size as u64 - 1;
    let data = fetch(reader, data_offset, data_end).await?;
    if data.len() != entry.compressed_size as usize {
        return Err(ZipError::Truncated {
            record: "entry data",
            offset: data_offset,
            needed: entry.compressed_size as usize,
            available: data.len(),
        });
    }

    log::info!(
        "fetched {} bytes of {:?} from offset {}",
        data.len(),
        entry.name,
        data_offset
    );

    Ok(data)
}

/// Ranged ZIP reader over a shared byte source
///
/// Ties the three stages together: [`locate`], [`parse_central_directory`]
/// and [`extract`].
pub struct ZipExtractor<R: RangeFetch> {
    reader: Arc<R>,
}

impl<R: RangeFetch> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }

    /// Locate the end of central directory record
    pub async fn locate(&self) -> ZipResult<EocdRecord> {
        locate(self.reader.as_ref(), self.reader.size()).await
    }

    /// Read the central directory described by `eocd`
    pub async fn read_directory(&self, eocd: &EocdRecord) -> ZipResult<FileList> {
        parse_central_directory(
            self.reader.as_ref(),
            eocd.central_directory_offset,
            eocd.central_directory_size,
            eocd.entry_count,
        )
        .await
    }

    /// List all files in the archive.
    ///
    /// An empty archive yields an empty list.
    pub async fn list_files(&self) -> ZipResult<FileList> {
        let eocd = self.locate().await?;
        self.read_directory(&eocd).await
    }

    /// Extract the raw (still compressed) bytes of an entry to memory
    pub async fn extract_to_memory(&self, entry: &EntryDescriptor) -> ZipResult<Vec<u8>> {
        extract(self.reader.as_ref(), entry).await
    }

    /// Extract the raw bytes of an entry into `dir`, named after the entry's
    /// base name. Returns the path written.
    pub async fn extract_to_dir(
        &self,
        entry: &EntryDescriptor,
        dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let Some(output_path) = entry.output_path(dir) else {
            bail!("Entry {:?} has no usable file name", entry.name);
        };

        if !overwrite && fs::try_exists(&output_path).await? {
            bail!("{} already exists", output_path.display());
        }

        let data = self.extract_to_memory(entry).await?;

        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).await?;
        }

        let mut file = fs::File::create(&output_path)
            .await
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(output_path)
    }

    /// Get a reference to the underlying reader
    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }
}
