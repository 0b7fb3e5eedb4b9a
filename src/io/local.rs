use super::{RangeFetch, clamp_range};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

/// Local file source with positional range reads
pub struct LocalFileReader {
    file: std::fs::File,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    #[cfg(unix)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        use std::os::windows::fs::FileExt;
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.file.seek_read(&mut buf[filled..], offset + filled as u64)?;
            if n == 0 {
                return Err(std::io::ErrorKind::UnexpectedEof.into());
            }
            filled += n;
        }
        Ok(())
    }

    #[cfg(not(any(unix, windows)))]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

#[async_trait]
impl RangeFetch for LocalFileReader {
    async fn fetch_range(&self, start: u64, end: u64) -> Result<Vec<u8>> {
        let end = clamp_range(start, end, self.size)?;
        let mut buf = vec![0u8; (end - start + 1) as usize];
        self.read_at(start, &mut buf)
            .with_context(|| format!("Failed to read bytes {}-{}", start, end))?;
        log::debug!("read local bytes {}-{}", start, end);
        Ok(buf)
    }

    fn size(&self) -> u64 {
        self.size
    }
}
