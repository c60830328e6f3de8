use crate::error::VfsError;
use crate::path;

/// A single in-memory file: a logical path and its immutable content.
///
/// Content is never modified after construction. Streams opened on the file
/// borrow the buffer instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    path: String,
    content: Vec<u8>,
}

impl VirtualFile {
    /// Create a file from a path and its bytes.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Logical path as supplied by the caller.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Length of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Last path segment, for diagnostics.
    pub fn file_name(&self) -> &str {
        path::file_name(&self.path)
    }
}

/// Ordered, append-only collection of [`VirtualFile`] entries.
///
/// The first entry is the root document an import starts from; the rest are
/// side-car files resolved by path while the root document is parsed.
///
/// Paths are not required to be unique. Lookup by path returns the first
/// entry added with that exact path.
///
/// # Example
///
/// ```
/// use meshport_vfs::VirtualFileList;
///
/// let mut files = VirtualFileList::new();
/// files.add_file("scene.obj", b"v 0 0 0\n".to_vec());
/// files.add_file("scene.mtl", b"newmtl red\n".to_vec());
///
/// assert_eq!(files.get_file(0).unwrap().path(), "scene.obj");
/// assert!(files.get_file_by_path("scene.mtl").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFileList {
    files: Vec<VirtualFile>,
}

impl VirtualFileList {
    /// Create an empty file list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file. Duplicated paths are accepted.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        let file = VirtualFile::new(path, content);
        log::trace!("added virtual file {} ({} bytes)", file.path, file.len());
        self.files.push(file);
    }

    /// Get the entry at `index`.
    ///
    /// Returns [`VfsError::OutOfRange`] when `index >= len()`.
    pub fn get_file(&self, index: usize) -> Result<&VirtualFile, VfsError> {
        self.files.get(index).ok_or(VfsError::OutOfRange {
            index,
            len: self.files.len(),
        })
    }

    /// Find the first entry whose path is exactly `path`.
    ///
    /// No normalization is applied: `"a/b.obj"`, `"./a/b.obj"` and `"A/B.OBJ"`
    /// are three different paths.
    pub fn get_file_by_path(&self, path: &str) -> Option<&VirtualFile> {
        self.files.iter().find(|file| file.path == path)
    }

    /// The root document (entry 0), if the list is not empty.
    pub fn root(&self) -> Option<&VirtualFile> {
        self.files.first()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, VirtualFile> {
        self.files.iter()
    }
}

impl<P: Into<String>, C: Into<Vec<u8>>> FromIterator<(P, C)> for VirtualFileList {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<P: Into<String>, C: Into<Vec<u8>>> Extend<(P, C)> for VirtualFileList {
    fn extend<I: IntoIterator<Item = (P, C)>>(&mut self, iter: I) {
        for (path, content) in iter {
            self.add_file(path, content);
        }
    }
}

impl<'a> IntoIterator for &'a VirtualFileList {
    type Item = &'a VirtualFile;
    type IntoIter = std::slice::Iter<'a, VirtualFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
