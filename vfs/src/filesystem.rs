use std::collections::HashSet;

use crate::error::VfsError;
use crate::file_list::VirtualFileList;
use crate::io::{IoStream, IoSystem};
use crate::stream::VirtualFileStream;

/// [`IoSystem`] backed by a [`VirtualFileList`].
///
/// Every `open` produces a fresh [`VirtualFileStream`] borrowing the matched
/// file; nothing is pooled or cached. The list must outlive the file system
/// and every stream it hands out, which the `'a` borrow enforces.
///
/// # Example
///
/// ```
/// use meshport_vfs::{IoStream, IoSystem, VirtualFileList, VirtualFileSystem};
///
/// let mut files = VirtualFileList::new();
/// files.add_file("scene.obj", b"v 0 0 0\n".to_vec());
///
/// let mut fs = VirtualFileSystem::new(&files);
/// assert!(fs.exists("scene.obj"));
///
/// let stream = fs.open("scene.obj", "rb").unwrap();
/// assert_eq!(stream.file_size(), 8);
/// fs.close(stream).unwrap();
/// ```
#[derive(Debug)]
pub struct VirtualFileSystem<'a> {
    files: &'a VirtualFileList,
    /// Addresses of the streams handed out and not yet closed.
    open_streams: HashSet<usize>,
}

impl<'a> VirtualFileSystem<'a> {
    /// Create a file system over `files`.
    pub fn new(files: &'a VirtualFileList) -> Self {
        Self {
            files,
            open_streams: HashSet::new(),
        }
    }

    /// The backing file list.
    pub fn files(&self) -> &'a VirtualFileList {
        self.files
    }

    /// Number of streams opened and not yet closed.
    pub fn open_streams(&self) -> usize {
        self.open_streams.len()
    }
}

fn stream_id(stream: &dyn IoStream) -> usize {
    std::ptr::from_ref(stream).cast::<()>() as usize
}

impl<'a> IoSystem<'a> for VirtualFileSystem<'a> {
    fn exists(&self, path: &str) -> bool {
        self.files.get_file_by_path(path).is_some()
    }

    fn open(&mut self, path: &str, mode: &str) -> Option<Box<dyn IoStream + 'a>> {
        let Some(file) = self.files.get_file_by_path(path) else {
            log::debug!("virtual file not found: {path}");
            return None;
        };

        // Only reading is supported; writes fail on the stream itself.
        log::trace!("opening virtual file {path} (mode {mode:?})");
        let stream: Box<dyn IoStream + 'a> = Box::new(VirtualFileStream::new(file));
        self.open_streams.insert(stream_id(&*stream));
        Some(stream)
    }

    fn close(&mut self, stream: Box<dyn IoStream + 'a>) -> Result<(), VfsError> {
        if !self.open_streams.remove(&stream_id(&*stream)) {
            log::warn!("close of a stream not opened by this virtual file system");
            return Err(VfsError::NotOpen);
        }
        drop(stream);
        Ok(())
    }

    fn os_separator(&self) -> char {
        crate::path::SEPARATOR
    }
}

impl Drop for VirtualFileSystem<'_> {
    fn drop(&mut self) {
        if !self.open_streams.is_empty() {
            log::warn!(
                "virtual file system dropped with {} stream(s) still open",
                self.open_streams.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeekOrigin;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn files() -> VirtualFileList {
        let mut list = VirtualFileList::new();
        list.add_file("scene.obj", b"v 1 2 3\n".to_vec());
        list.add_file("textures/wood.png", vec![0x89, b'P', b'N', b'G']);
        list
    }

    #[test]
    fn exists_for_added_paths() {
        let list = files();
        let fs = VirtualFileSystem::new(&list);
        assert!(fs.exists("scene.obj"));
        assert!(fs.exists("textures/wood.png"));
        assert!(!fs.exists("wood.png"));
        assert!(!fs.exists("scene.mtl"));
    }

    #[test]
    fn exists_has_no_side_effects() {
        let list = files();
        let fs = VirtualFileSystem::new(&list);
        for _ in 0..3 {
            assert!(fs.exists("scene.obj"));
        }
        assert_eq!(fs.open_streams(), 0);
        assert_eq!(fs.files().len(), 2);
    }

    #[test]
    fn open_missing_returns_none() {
        init_logger();
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        assert!(fs.open("missing.obj", "rb").is_none());
        assert_eq!(fs.open_streams(), 0);
    }

    #[test]
    fn open_read_close() {
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut stream = fs.open("scene.obj", "rb").unwrap();
        assert_eq!(fs.open_streams(), 1);

        let size = stream.file_size();
        let mut buf = vec![0u8; size];
        let n = stream.read(&mut buf, 1, size);
        assert_eq!(&buf[..n], b"v 1 2 3\n");

        fs.close(stream).unwrap();
        assert_eq!(fs.open_streams(), 0);
    }

    #[test]
    fn write_mode_opens_but_rejects_writes() {
        init_logger();
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut stream = fs.open("scene.obj", "wb").unwrap();
        assert!(matches!(
            stream.write(b"x", 1, 1),
            Err(VfsError::Unsupported(_))
        ));
        fs.close(stream).unwrap();
    }

    #[test]
    fn streams_are_independent() {
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut a = fs.open("scene.obj", "rb").unwrap();
        let b = fs.open("scene.obj", "rb").unwrap();
        a.seek(4, SeekOrigin::Start).unwrap();
        assert_eq!(a.tell(), 4);
        assert_eq!(b.tell(), 0);
        assert_eq!(fs.open_streams(), 2);
        fs.close(a).unwrap();
        fs.close(b).unwrap();
    }

    #[test]
    fn unbalanced_close_is_reported() {
        init_logger();
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut other = VirtualFileSystem::new(&list);
        let stream = other.open("scene.obj", "rb").unwrap();
        assert_eq!(fs.close(stream), Err(VfsError::NotOpen));
    }

    #[test]
    fn stream_from_another_system_is_rejected() {
        init_logger();
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut other = VirtualFileSystem::new(&list);
        let mine = fs.open("scene.obj", "rb").unwrap();
        let foreign = other.open("scene.obj", "rb").unwrap();

        assert_eq!(fs.close(foreign), Err(VfsError::NotOpen));
        assert_eq!(fs.open_streams(), 1);
        assert_eq!(fs.close(mine), Ok(()));
        assert_eq!(fs.open_streams(), 0);
    }

    #[test]
    fn separator_is_slash() {
        let list = files();
        let fs = VirtualFileSystem::new(&list);
        assert_eq!(fs.os_separator(), '/');
    }
}
