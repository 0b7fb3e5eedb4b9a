//! Locating and decoding the central directory.
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) in the file's tail
//! 2. Fetch the whole Central Directory in one range and decode it
//!
//! Both steps only touch the archive through [`RangeFetch`], so listing a
//! remote archive costs two range requests regardless of its size.

use byteorder::{ByteOrder, LittleEndian};
use memchr::memmem::FinderRev;

use crate::io::RangeFetch;

use super::error::{ZipError, ZipResult};
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
const MAX_COMMENT_SIZE: u64 = 65535;

/// How far back from the end of the archive the EOCD can start
pub const EOCD_SEARCH_WINDOW: u64 = MAX_COMMENT_SIZE + EocdView::SIZE as u64;

/// First byte of the tail fetched when searching for the EOCD
pub fn tail_start(total_size: u64) -> u64 {
    total_size.saturating_sub(EOCD_SEARCH_WINDOW)
}

/// Fetch a range, tagging transport failures with the requested span
pub(crate) async fn fetch<R: RangeFetch + ?Sized>(
    reader: &R,
    start: u64,
    end: u64,
) -> ZipResult<Vec<u8>> {
    log::debug!("fetching bytes {}-{}", start, end);
    reader
        .fetch_range(start, end)
        .await
        .map_err(|e| ZipError::fetch(start, end, e))
}

/// Find the EOCD in a tail buffer.
///
/// Scans backwards from the last position a complete 22-byte record can
/// start at. A candidate is accepted when its comment length accounts for
/// exactly the bytes that follow it, which skips signature bytes that happen
/// to appear inside a comment. Returns the candidate's index in `tail`.
pub(crate) fn find_eocd(tail: &[u8]) -> Option<usize> {
    let searchable = tail.len().checked_sub(EocdView::SIZE)? + 4;
    let signature = EocdView::SIGNATURE.to_be_bytes();
    let finder = FinderRev::new(&signature);

    finder.rfind_iter(&tail[..searchable]).find(|&i| {
        let field = EocdView::COMMENT_LENGTH;
        let comment_len =
            LittleEndian::read_u16(&tail[i + field.offset..i + field.offset + field.width]);
        comment_len as usize == tail.len() - i - EocdView::SIZE
    })
}

/// Locate the End of Central Directory record.
///
/// Fetches at most the last 65557 bytes of the archive in a single range
/// and searches them backwards for the EOCD signature.
///
/// An archive with no entries is a valid result; check
/// [`EocdRecord::is_empty`] before going further.
///
/// # Errors
///
/// [`ZipError::EocdNotFound`] when no EOCD lies in the fetched window (not a
/// ZIP file, or a comment longer than the format allows), and
/// [`ZipError::DirectoryOutOfBounds`] when the record points past the end of
/// the archive.
pub async fn locate<R: RangeFetch + ?Sized>(reader: &R, total_size: u64) -> ZipResult<EocdRecord> {
    let start = tail_start(total_size);
    let window = total_size - start;

    if window < EocdView::SIZE as u64 {
        return Err(ZipError::EocdNotFound { window });
    }

    let tail = fetch(reader, start, total_size).await?;
    let pos = find_eocd(&tail).ok_or(ZipError::EocdNotFound { window })?;
    let record = EocdView::new(&tail[pos..], start + pos as u64)?.record();

    let cd_end = record.central_directory_offset as u64 + record.central_directory_size as u64;
    if cd_end > total_size {
        return Err(ZipError::DirectoryOutOfBounds {
            offset: record.central_directory_offset,
            size: record.central_directory_size,
            archive_size: total_size,
        });
    }

    log::info!(
        "EOCD at offset {}: {} entries, central directory {} bytes at {}",
        start + pos as u64,
        record.entry_count,
        record.central_directory_size,
        record.central_directory_offset
    );

    Ok(record)
}

/// Decode the central directory into a [`FileList`].
///
/// Fetches `[cd_offset, cd_offset + cd_size]` in one range and decodes
/// exactly `entry_count` records from it. No fetch is made for an empty
/// directory.
///
/// # Errors
///
/// Any record with a bad signature, a record running past the fetched
/// bytes, a non-UTF-8 name, or a local header offset outside the archive
/// fails the whole parse.
pub async fn parse_central_directory<R: RangeFetch + ?Sized>(
    reader: &R,
    cd_offset: u32,
    cd_size: u32,
    entry_count: u16,
) -> ZipResult<FileList> {
    if entry_count == 0 {
        return Ok(FileList::default());
    }

    let base = cd_offset as u64;
    let archive_size = reader.size();
    if base >= archive_size || base + cd_size as u64 > archive_size {
        return Err(ZipError::DirectoryOutOfBounds {
            offset: cd_offset,
            size: cd_size,
            archive_size,
        });
    }

    let cd_data = fetch(reader, base, base + cd_size as u64).await?;

    let mut entries = Vec::with_capacity(entry_count as usize);
    let mut pos = 0usize;

    for _ in 0..entry_count {
        let record_offset = base + pos as u64;
        let header = CdfView::new(&cd_data[pos.min(cd_data.len())..], record_offset)?;

        let record_len = header.record_len();
        if pos + record_len > cd_data.len() {
            return Err(ZipError::Truncated {
                record: "central directory file header",
                offset: record_offset,
                needed: record_len,
                available: cd_data.len() - pos,
            });
        }

        let name_start = pos + CdfView::SIZE;
        let name_bytes = &cd_data[name_start..name_start + header.name_length()];
        let name = std::str::from_utf8(name_bytes)
            .map_err(|source| ZipError::InvalidName {
                offset: record_offset,
                source,
            })?
            .to_string();

        let offset = header.local_header_offset();
        if offset as u64 >= archive_size {
            return Err(ZipError::EntryOutOfBounds {
                name,
                offset,
                archive_size,
            });
        }

        log::debug!(
            "entry {:?}: method {}, {} -> {} bytes, local header at {}",
            name,
            header.compression_method(),
            header.compressed_size(),
            header.uncompressed_size(),
            offset
        );

        entries.push(EntryDescriptor {
            name,
            offset,
            compression_method: CompressionMethod::from_u16(header.compression_method()),
            compressed_size: header.compressed_size(),
            uncompressed_size: header.uncompressed_size(),
        });

        pos += record_len;
    }

    Ok(FileList::new(entries))
}
