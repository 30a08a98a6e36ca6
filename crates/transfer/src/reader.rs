use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use crate::TransferError;
use crate::plan::PlannedPart;

/// Random-access reader over a local file.
///
/// Reads exactly one byte range at a time so that the whole artifact is
/// never buffered in memory. The handle is shared behind a mutex; callers
/// in async code should invoke [`read_range`](Self::read_range) from
/// `spawn_blocking`.
pub struct RangeReader {
    file: Mutex<std::fs::File>,
    file_size: u64,
}

impl RangeReader {
    /// Opens `path` for range reads.
    pub fn open(path: &Path) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            file_size,
        })
    }

    /// Reads exactly `len` bytes starting at `offset`.
    ///
    /// A file that shrank since it was opened yields an `UnexpectedEof`
    /// I/O error rather than a short buffer.
    pub fn read_range(&self, offset: u64, len: u64) -> Result<Vec<u8>, TransferError> {
        let mut buf = vec![0u8; len as usize];
        let mut file = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("range reader lock poisoned"))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads the bytes of a planned part.
    pub fn read_part(&self, part: &PlannedPart) -> Result<Vec<u8>, TransferError> {
        self.read_range(part.offset, part.len)
    }

    /// File size observed when the reader was opened.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }
}
