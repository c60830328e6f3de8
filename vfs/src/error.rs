use std::fmt;

/// Errors that can occur during virtual file system operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsError {
    /// The requested path has no matching entry in the file list.
    NotFound(String),
    /// The operation is not supported by a read-only virtual file.
    Unsupported(&'static str),
    /// Index-based access beyond the number of entries.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of entries in the list.
        len: usize,
    },
    /// An argument was rejected before any work was done.
    InvalidArgument(String),
    /// A stream was closed that this file system does not have open.
    NotOpen,
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::NotFound(path) => write!(f, "not found: {path}"),
            VfsError::Unsupported(op) => write!(f, "unsupported operation: {op}"),
            VfsError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} file(s)")
            }
            VfsError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            VfsError::NotOpen => write!(f, "stream is not open in this file system"),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<VfsError> for std::io::Error {
    fn from(err: VfsError) -> Self {
        let kind = match err {
            VfsError::NotFound(_) => std::io::ErrorKind::NotFound,
            VfsError::Unsupported(_) => std::io::ErrorKind::Unsupported,
            VfsError::OutOfRange { .. } | VfsError::InvalidArgument(_) => {
                std::io::ErrorKind::InvalidInput
            }
            VfsError::NotOpen => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
