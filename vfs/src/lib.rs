//! In-memory virtual file system for scene importers.
//!
//! Callers that hold a scene and its side-car resources as byte buffers (for
//! example uploads) put them in a [`VirtualFileList`]. A
//! [`VirtualFileSystem`] over that list implements the [`IoSystem`] contract
//! an import engine pulls files through, and hands out [`VirtualFileStream`]
//! cursors with random-access read semantics.
//!
//! # Ownership
//!
//! The list owns every file. The file system and its streams borrow from the
//! list, so the list must outlive both; the borrow checker enforces this.
//!
//! # Example
//!
//! ```
//! use meshport_vfs::{IoStream, IoSystem, SeekOrigin, VirtualFileList, VirtualFileSystem};
//!
//! let mut files = VirtualFileList::new();
//! files.add_file("scene.obj", b"v 0 0 0\nv 1 0 0\n".to_vec());
//!
//! let mut fs = VirtualFileSystem::new(&files);
//! let mut stream = fs.open("scene.obj", "rb").unwrap();
//!
//! stream.seek(8, SeekOrigin::Start).unwrap();
//! let mut line = [0u8; 8];
//! assert_eq!(stream.read(&mut line, 1, 8), 8);
//! assert_eq!(&line, b"v 1 0 0\n");
//!
//! fs.close(stream).unwrap();
//! ```

mod error;
mod file_list;
mod filesystem;
pub mod io;
pub mod path;
mod stream;

pub use error::VfsError;
pub use file_list::{VirtualFile, VirtualFileList};
pub use filesystem::VirtualFileSystem;
pub use io::{IoStream, IoSystem, SeekOrigin, StreamReader, read_to_end};
pub use stream::VirtualFileStream;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

    fn files() -> VirtualFileList {
        let mut list = VirtualFileList::new();
        list.add_file("notes.txt", b"first line\nsecond line\n".to_vec());
        list
    }

    #[test]
    fn std_reader_reads_whole_file() {
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let stream = fs.open("notes.txt", "r").unwrap();

        let mut reader = StreamReader::new(stream);
        let mut data = Vec::new();
        reader.read_to_end(&mut data).unwrap();
        assert_eq!(data, list.get_file(0).unwrap().content());

        fs.close(reader.into_inner()).unwrap();
    }

    #[test]
    fn std_reader_lines() {
        let list = files();
        let mut fs = VirtualFileSystem::new(&list);
        let mut stream = fs.open("notes.txt", "r").unwrap();

        let lines: Vec<String> = BufReader::new(StreamReader::new(&mut stream))
            .lines()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["first line", "second line"]);

        fs.close(stream).unwrap();
    }

    #[test]
    fn std_seek_from_end_is_std_convention() {
        let list = files();
        let file = list.get_file(0).unwrap();
        let mut reader = StreamReader::new(VirtualFileStream::new(file));

        let pos = reader.seek(SeekFrom::End(-5)).unwrap();
        assert_eq!(pos, file.len() as u64 - 5);
        let mut tail = String::new();
        reader.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "line\n");
    }

    #[test]
    fn std_seek_negative_is_rejected() {
        let list = files();
        let file = list.get_file(0).unwrap();
        let mut reader = StreamReader::new(VirtualFileStream::new(file));
        reader.seek(SeekFrom::Start(3)).unwrap();

        let err = reader.seek(SeekFrom::Current(-10)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert_eq!(reader.get_ref().tell(), 3);
    }

    #[test]
    fn read_to_end_from_position() {
        let list = files();
        let mut stream = VirtualFileStream::new(list.get_file(0).unwrap());
        stream.seek(11, SeekOrigin::Start).unwrap();
        assert_eq!(read_to_end(&mut stream), b"second line\n");
        assert!(read_to_end(&mut stream).is_empty());
    }

    #[test]
    fn read_to_end_outside_file_is_empty() {
        let list = files();
        let mut stream = VirtualFileStream::new(list.get_file(0).unwrap());
        for position in [i64::MIN, -1, i64::MAX] {
            stream.seek(position, SeekOrigin::Start).unwrap();
            assert!(read_to_end(&mut stream).is_empty());
            assert_eq!(stream.tell(), position);
        }
    }
}
