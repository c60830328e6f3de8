//! The file access contract an import engine pulls data through.
//!
//! An engine never touches files directly. It asks an [`IoSystem`] whether a
//! path exists, opens an [`IoStream`] for it, reads and seeks, and hands the
//! stream back to [`IoSystem::close`] when done.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::VfsError;

/// Reference point for [`IoStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekOrigin {
    /// Offset from the beginning of the file.
    Start,
    /// Offset from the current position.
    Current,
    /// Offset back from the end of the file (`position = size - offset`).
    End,
}

/// Random-access byte stream handed out by an [`IoSystem`].
pub trait IoStream {
    /// Read up to `element_size * element_count` bytes into `buffer`.
    ///
    /// Returns the number of bytes copied. A short count (including zero)
    /// means the end of the file was reached; it is not an error.
    fn read(&mut self, buffer: &mut [u8], element_size: usize, element_count: usize) -> usize;

    /// Write `element_size * element_count` bytes from `buffer`.
    fn write(
        &mut self,
        buffer: &[u8],
        element_size: usize,
        element_count: usize,
    ) -> Result<usize, VfsError>;

    /// Move the cursor relative to `origin`.
    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), VfsError>;

    /// Current cursor position.
    fn tell(&self) -> i64;

    /// Total size of the file in bytes.
    fn file_size(&self) -> usize;

    /// Flush pending writes.
    fn flush(&mut self);
}

/// File provider an import engine resolves every path through.
///
/// `'a` is the lifetime of the data backing the streams. Streams may outlive
/// the borrow of the system that opened them, but not the data.
pub trait IoSystem<'a> {
    /// Whether `path` can be opened.
    fn exists(&self, path: &str) -> bool;

    /// Open `path`. `None` means the file does not exist.
    fn open(&mut self, path: &str, mode: &str) -> Option<Box<dyn IoStream + 'a>>;

    /// Release a stream returned by [`open`](IoSystem::open).
    fn close(&mut self, stream: Box<dyn IoStream + 'a>) -> Result<(), VfsError>;

    /// Path separator understood by this system.
    fn os_separator(&self) -> char {
        '/'
    }
}

impl<S: IoStream + ?Sized> IoStream for &mut S {
    fn read(&mut self, buffer: &mut [u8], element_size: usize, element_count: usize) -> usize {
        (**self).read(buffer, element_size, element_count)
    }

    fn write(
        &mut self,
        buffer: &[u8],
        element_size: usize,
        element_count: usize,
    ) -> Result<usize, VfsError> {
        (**self).write(buffer, element_size, element_count)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), VfsError> {
        (**self).seek(offset, origin)
    }

    fn tell(&self) -> i64 {
        (**self).tell()
    }

    fn file_size(&self) -> usize {
        (**self).file_size()
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

impl<S: IoStream + ?Sized> IoStream for Box<S> {
    fn read(&mut self, buffer: &mut [u8], element_size: usize, element_count: usize) -> usize {
        (**self).read(buffer, element_size, element_count)
    }

    fn write(
        &mut self,
        buffer: &[u8],
        element_size: usize,
        element_count: usize,
    ) -> Result<usize, VfsError> {
        (**self).write(buffer, element_size, element_count)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), VfsError> {
        (**self).seek(offset, origin)
    }

    fn tell(&self) -> i64 {
        (**self).tell()
    }

    fn file_size(&self) -> usize {
        (**self).file_size()
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Read the remaining bytes of a stream into a vector.
pub fn read_to_end<S: IoStream + ?Sized>(stream: &mut S) -> Vec<u8> {
    let remaining = i64::try_from(stream.file_size())
        .ok()
        .and_then(|size| size.checked_sub(stream.tell()))
        .and_then(|left| usize::try_from(left).ok())
        .unwrap_or(0);
    let mut data = vec![0u8; remaining];
    let read = stream.read(&mut data, 1, remaining);
    data.truncate(read);
    data
}

/// Adapts an [`IoStream`] to [`std::io::Read`] and [`std::io::Seek`].
///
/// Lets ecosystem parsers that expect `std` readers (`BufReader`, format
/// crates) consume virtual files. Unlike [`IoStream::seek`], seeking through
/// this adapter follows the `std` contract: a resulting negative position is
/// an [`io::ErrorKind::InvalidInput`] error and leaves the cursor untouched.
pub struct StreamReader<S> {
    stream: S,
}

impl<S: IoStream> StreamReader<S> {
    /// Wrap a stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Borrow the wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: IoStream> Read for StreamReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        Ok(self.stream.read(buf, 1, len))
    }
}

impl<S: IoStream> Seek for StreamReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).ok(),
            SeekFrom::Current(delta) => self.stream.tell().checked_add(delta),
            SeekFrom::End(delta) => i64::try_from(self.stream.file_size())
                .ok()
                .and_then(|size| size.checked_add(delta)),
        };

        let target = match target {
            Some(target) if target >= 0 => target,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "invalid seek to a negative or overflowing position",
                ));
            }
        };

        self.stream.seek(target, SeekOrigin::Start)?;
        Ok(target as u64)
    }
}
