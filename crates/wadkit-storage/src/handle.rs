//! Archive stream windows
//!
//! An archive may be a plain file or a file packed inside a larger container.
//! [`ArchiveHandle`] addresses it as a `length`-byte window starting at
//! `start` in the underlying stream; directory offsets are relative to the
//! window start.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Opened archive stream with its window
#[derive(Debug)]
pub struct ArchiveHandle<R> {
    reader: R,
    start: u64,
    length: u64,
}

impl ArchiveHandle<File> {
    /// Open a file as a whole-file window
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        Ok(Self::new(file, 0, length))
    }
}

impl<R: Read + Seek> ArchiveHandle<R> {
    /// Wrap a stream window
    pub fn new(reader: R, start: u64, length: u64) -> Self {
        Self {
            reader,
            start,
            length,
        }
    }

    /// Window start in the underlying stream
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Window length, the physical archive length
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Position the stream at the window start and borrow it
    pub fn rewind(&mut self) -> io::Result<&mut R> {
        self.reader.seek(SeekFrom::Start(self.start))?;
        Ok(&mut self.reader)
    }

    /// Read `size` bytes at `offset` within the window
    pub fn read_range(&mut self, offset: u64, size: u64) -> io::Result<Vec<u8>> {
        let end = offset.checked_add(size);
        if end.is_none_or(|end| end > self.length) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Read beyond archive bounds: {} + {} > {}",
                    offset, size, self.length
                ),
            ));
        }

        self.reader.seek(SeekFrom::Start(self.start + offset))?;
        let mut data = vec![0u8; size as usize];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    /// Read the whole window
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.read_range(0, self.length)
    }

    /// Release the window and return the stream
    pub fn into_inner(self) -> R {
        self.reader
    }
}
