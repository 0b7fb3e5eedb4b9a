use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::path::Path;

use super::error::{ZipError, ZipResult};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Position and width of a fixed field inside a header record
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    pub offset: usize,
    pub width: usize,
}

impl Field {
    const fn u16(offset: usize) -> Self {
        Self { offset, width: 2 }
    }

    const fn u32(offset: usize) -> Self {
        Self { offset, width: 4 }
    }

    fn bytes<'a>(&self, record: &'a [u8]) -> &'a [u8] {
        &record[self.offset..self.offset + self.width]
    }
}

/// Fixed part of a header record: its name, signature and size
struct Layout {
    name: &'static str,
    signature: u32,
    size: usize,
}

/// Signatures are compared as big-endian words, the way they read in a hex dump
const SIGNATURE: Field = Field::u32(0);

/// Borrowed view over one header record.
///
/// Construction checks the length and signature; after that every field
/// read is in bounds.
#[derive(Clone, Copy)]
struct RecordView<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    fn new(layout: &Layout, bytes: &'a [u8], offset: u64) -> ZipResult<Self> {
        if bytes.len() < layout.size {
            return Err(ZipError::Truncated {
                record: layout.name,
                offset,
                needed: layout.size,
                available: bytes.len(),
            });
        }

        let actual = BigEndian::read_u32(SIGNATURE.bytes(bytes));
        if actual != layout.signature {
            return Err(ZipError::InvalidSignature {
                record: layout.name,
                offset,
                expected: layout.signature,
                actual,
            });
        }

        Ok(Self { bytes })
    }

    fn u16(&self, field: Field) -> u16 {
        debug_assert_eq!(field.width, 2);
        LittleEndian::read_u16(field.bytes(self.bytes))
    }

    fn u32(&self, field: Field) -> u32 {
        debug_assert_eq!(field.width, 4);
        LittleEndian::read_u32(field.bytes(self.bytes))
    }
}

/// End of Central Directory (EOCD) - 22 bytes plus comment
pub(crate) struct EocdView<'a>(RecordView<'a>);

impl<'a> EocdView<'a> {
    const LAYOUT: Layout = Layout {
        name: "end of central directory",
        signature: 0x504b_0506,
        size: 22,
    };
    pub const SIGNATURE: u32 = Self::LAYOUT.signature;
    pub const SIZE: usize = Self::LAYOUT.size;

    const ENTRY_COUNT: Field = Field::u16(10);
    const CD_SIZE: Field = Field::u32(12);
    const CD_OFFSET: Field = Field::u32(16);
    pub const COMMENT_LENGTH: Field = Field::u16(20);

    pub fn new(bytes: &'a [u8], offset: u64) -> ZipResult<Self> {
        RecordView::new(&Self::LAYOUT, bytes, offset).map(Self)
    }

    pub fn record(&self) -> EocdRecord {
        EocdRecord {
            central_directory_offset: self.0.u32(Self::CD_OFFSET),
            central_directory_size: self.0.u32(Self::CD_SIZE),
            entry_count: self.0.u16(Self::ENTRY_COUNT),
            comment_length: self.0.u16(Self::COMMENT_LENGTH),
        }
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus name, extra, comment
pub(crate) struct CdfView<'a>(RecordView<'a>);

impl<'a> CdfView<'a> {
    const LAYOUT: Layout = Layout {
        name: "central directory file header",
        signature: 0x504b_0102,
        size: 46,
    };
    pub const SIZE: usize = Self::LAYOUT.size;

    const COMPRESSION_METHOD: Field = Field::u16(10);
    const COMPRESSED_SIZE: Field = Field::u32(20);
    const UNCOMPRESSED_SIZE: Field = Field::u32(24);
    const NAME_LENGTH: Field = Field::u16(28);
    const EXTRA_LENGTH: Field = Field::u16(30);
    const COMMENT_LENGTH: Field = Field::u16(32);
    const LOCAL_HEADER_OFFSET: Field = Field::u32(42);

    pub fn new(bytes: &'a [u8], offset: u64) -> ZipResult<Self> {
        RecordView::new(&Self::LAYOUT, bytes, offset).map(Self)
    }

    pub fn compression_method(&self) -> u16 {
        self.0.u16(Self::COMPRESSION_METHOD)
    }

    pub fn compressed_size(&self) -> u32 {
        self.0.u32(Self::COMPRESSED_SIZE)
    }

    pub fn uncompressed_size(&self) -> u32 {
        self.0.u32(Self::UNCOMPRESSED_SIZE)
    }

    pub fn name_length(&self) -> usize {
        self.0.u16(Self::NAME_LENGTH) as usize
    }

    pub fn extra_length(&self) -> usize {
        self.0.u16(Self::EXTRA_LENGTH) as usize
    }

    pub fn comment_length(&self) -> usize {
        self.0.u16(Self::COMMENT_LENGTH) as usize
    }

    pub fn local_header_offset(&self) -> u32 {
        self.0.u32(Self::LOCAL_HEADER_OFFSET)
    }

    /// Size of the whole record including its variable-length trailer
    pub fn record_len(&self) -> usize {
        Self::SIZE + self.name_length() + self.extra_length() + self.comment_length()
    }
}

/// Local File Header (LFH) - 30 bytes plus name and extra
pub(crate) struct LfhView<'a>(RecordView<'a>);

impl<'a> LfhView<'a> {
    const LAYOUT: Layout = Layout {
        name: "local file header",
        signature: 0x504b_0304,
        size: 30,
    };
    pub const SIZE: usize = Self::LAYOUT.size;

    const COMPRESSED_SIZE: Field = Field::u32(18);
    const UNCOMPRESSED_SIZE: Field = Field::u32(22);
    const NAME_LENGTH: Field = Field::u16(26);
    const EXTRA_LENGTH: Field = Field::u16(28);

    pub fn new(bytes: &'a [u8], offset: u64) -> ZipResult<Self> {
        RecordView::new(&Self::LAYOUT, bytes, offset).map(Self)
    }

    pub fn compressed_size(&self) -> u32 {
        self.0.u32(Self::COMPRESSED_SIZE)
    }

    pub fn uncompressed_size(&self) -> u32 {
        self.0.u32(Self::UNCOMPRESSED_SIZE)
    }

    pub fn name_length(&self) -> u64 {
        self.0.u16(Self::NAME_LENGTH) as u64
    }

    pub fn extra_length(&self) -> u64 {
        self.0.u16(Self::EXTRA_LENGTH) as u64
    }
}

/// Central directory location, as recorded in the EOCD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EocdRecord {
    pub central_directory_offset: u32,
    pub central_directory_size: u32,
    pub entry_count: u16,
    pub comment_length: u16,
}

impl EocdRecord {
    /// True when the archive has no members, i.e. there is nothing to fetch
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// One archive member, as listed in the central directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    pub name: String,
    /// Absolute offset of the local file header
    pub offset: u32,
    pub compression_method: CompressionMethod,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl EntryDescriptor {
    /// Last path component of the entry name.
    ///
    /// Both `/` and `\` count as separators. Returns `None` for directory
    /// entries and names whose last component is `.` or `..`.
    pub fn base_name(&self) -> Option<&str> {
        let base = self.name.rsplit(['/', '\\']).next()?;
        match base {
            "" | "." | ".." => None,
            _ => Some(base),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Where extraction of this entry lands inside `dir`
    pub fn output_path(&self, dir: &Path) -> Option<std::path::PathBuf> {
        self.base_name().map(|base| dir.join(base))
    }
}

/// Archive members in central-directory order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    entries: Vec<EntryDescriptor>,
}

impl FileList {
    pub fn new(entries: Vec<EntryDescriptor>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryDescriptor> {
        self.entries.iter()
    }

    /// Pick an entry by its 1-based position in the listing
    pub fn select(&self, index: usize) -> ZipResult<&EntryDescriptor> {
        if self.entries.is_empty() {
            return Err(ZipError::EmptyFileList);
        }
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(ZipError::InvalidSelection {
                index,
                count: self.entries.len(),
            })
    }
}
