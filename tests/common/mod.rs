#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

const LFH_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
const CDFH_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
const EOCD_SIGNATURE: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];

#[derive(Debug, Clone)]
pub struct TestEntry {
    pub name: String,
    pub method: u16,
    /// Bytes as stored in the archive
    pub payload: Vec<u8>,
    pub uncompressed_size: u32,
    /// Extra field written only to the local header
    pub local_extra: Vec<u8>,
    /// Extra field and comment written only to the central directory
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
}

impl TestEntry {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            method: 0,
            payload: data.to_vec(),
            uncompressed_size: data.len() as u32,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
        }
    }

    /// Entry whose payload is really deflated `data`
    pub fn deflated(name: &str, data: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        Self {
            method: 8,
            payload: encoder.finish().unwrap(),
            uncompressed_size: data.len() as u32,
            ..Self::stored(name, b"")
        }
    }

    /// Entry with an arbitrary payload claiming the given method and size
    pub fn raw(name: &str, method: u16, payload: &[u8], uncompressed_size: u32) -> Self {
        Self {
            method,
            uncompressed_size,
            ..Self::stored(name, payload)
        }
    }

    pub fn with_local_extra(mut self, extra: &[u8]) -> Self {
        self.local_extra = extra.to_vec();
        self
    }

    pub fn with_central_extra(mut self, extra: &[u8], comment: &[u8]) -> Self {
        self.central_extra = extra.to_vec();
        self.comment = comment.to_vec();
        self
    }
}

/// A synthetic archive plus where its records ended up
pub struct TestArchive {
    pub bytes: Vec<u8>,
    pub lfh_offsets: Vec<usize>,
    pub cdfh_offsets: Vec<usize>,
    pub cd_offset: usize,
    pub cd_size: usize,
    pub eocd_offset: usize,
}

#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<TestEntry>,
    comment: Vec<u8>,
    prefix: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, entry: TestEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn comment(mut self, comment: Vec<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Bytes placed before the first local header
    pub fn prefix(mut self, prefix: Vec<u8>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn build(self) -> TestArchive {
        let mut out = self.prefix.clone();
        let mut lfh_offsets = Vec::new();

        for e in &self.entries {
            lfh_offsets.push(out.len());
            out.extend_from_slice(&LFH_SIGNATURE);
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&e.method.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // mod time
            out.extend_from_slice(&0u16.to_le_bytes()); // mod date
            out.extend_from_slice(&0u32.to_le_bytes()); // crc32
            out.extend_from_slice(&(e.payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&e.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&(e.local_extra.len() as u16).to_le_bytes());
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&e.local_extra);
            out.extend_from_slice(&e.payload);
        }

        let cd_offset = out.len();
        let mut cdfh_offsets = Vec::new();

        for (e, &lfh_offset) in self.entries.iter().zip(&lfh_offsets) {
            cdfh_offsets.push(out.len());
            out.extend_from_slice(&CDFH_SIGNATURE);
            out.extend_from_slice(&20u16.to_le_bytes()); // version made by
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&e.method.to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // mod time
            out.extend_from_slice(&0u16.to_le_bytes()); // mod date
            out.extend_from_slice(&0u32.to_le_bytes()); // crc32
            out.extend_from_slice(&(e.payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&e.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&(e.central_extra.len() as u16).to_le_bytes());
            out.extend_from_slice(&(e.comment.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // disk number start
            out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            out.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            out.extend_from_slice(&(lfh_offset as u32).to_le_bytes());
            out.extend_from_slice(e.name.as_bytes());
            out.extend_from_slice(&e.central_extra);
            out.extend_from_slice(&e.comment);
        }

        let cd_size = out.len() - cd_offset;
        let eocd_offset = out.len();
        let count = self.entries.len() as u16;

        out.extend_from_slice(&EOCD_SIGNATURE);
        out.extend_from_slice(&0u16.to_le_bytes()); // disk number
        out.extend_from_slice(&0u16.to_le_bytes()); // disk with central directory
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&(cd_size as u32).to_le_bytes());
        out.extend_from_slice(&(cd_offset as u32).to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);

        TestArchive {
            bytes: out,
            lfh_offsets,
            cdfh_offsets,
            cd_offset,
            cd_size,
            eocd_offset,
        }
    }
}

/// Deterministic filler bytes
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}
