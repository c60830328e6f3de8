use crate::error::VfsError;
use crate::file_list::VirtualFile;
use crate::io::{IoStream, SeekOrigin};

/// Read-only random-access cursor over one [`VirtualFile`].
///
/// The stream borrows the file content; it never copies it. The position is
/// signed and unclamped: seeking before the start or past the end is
/// accepted, and reads from such a position return zero bytes.
#[derive(Debug, Clone)]
pub struct VirtualFileStream<'a> {
    file: &'a VirtualFile,
    position: i64,
}

impl<'a> VirtualFileStream<'a> {
    /// Open a cursor at the start of `file`.
    pub fn new(file: &'a VirtualFile) -> Self {
        Self { file, position: 0 }
    }

    /// The file this stream reads from.
    pub fn file(&self) -> &'a VirtualFile {
        self.file
    }

    /// Bytes left between the position and the end of the file.
    ///
    /// Zero when the position is outside `[0, size)`.
    pub fn remaining(&self) -> usize {
        match usize::try_from(self.position) {
            Ok(pos) => self.file.len().saturating_sub(pos),
            Err(_) => 0,
        }
    }

    fn size(&self) -> i64 {
        i64::try_from(self.file.len()).unwrap_or(i64::MAX)
    }
}

impl IoStream for VirtualFileStream<'_> {
    fn read(&mut self, buffer: &mut [u8], element_size: usize, element_count: usize) -> usize {
        let requested = element_size.saturating_mul(element_count);
        let count = requested.min(self.remaining()).min(buffer.len());
        if count == 0 {
            return 0;
        }

        // remaining() > 0 implies position is within [0, size).
        let start = self.position as usize;
        buffer[..count].copy_from_slice(&self.file.content()[start..start + count]);
        self.position += count as i64;
        count
    }

    fn write(
        &mut self,
        _buffer: &[u8],
        _element_size: usize,
        _element_count: usize,
    ) -> Result<usize, VfsError> {
        log::warn!("write rejected on read-only virtual file {}", self.file.path());
        Err(VfsError::Unsupported("write to a read-only virtual file"))
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<(), VfsError> {
        self.position = match origin {
            SeekOrigin::Start => offset,
            SeekOrigin::Current => self.position.saturating_add(offset),
            SeekOrigin::End => self.size().saturating_sub(offset),
        };
        Ok(())
    }

    fn tell(&self) -> i64 {
        self.position
    }

    fn file_size(&self) -> usize {
        self.file.len()
    }

    fn flush(&mut self) {}
}
