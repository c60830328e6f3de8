//! One-call import of an in-memory file list.
//!
//! Entry 0 of the list is the root document; the remaining entries are the
//! side-car files it may reference. Each call builds its own
//! [`VirtualFileSystem`] and [`Importer`], so nothing is shared between
//! imports.

use std::fmt;

use meshport_vfs::{VirtualFile, VirtualFileList, VirtualFileSystem};
use serde::Serialize;

use crate::error::{ImportError, ImportResult};
use crate::importer::Importer;
use crate::postprocess::PostProcessSteps;
use crate::scene::Scene;

/// Outcome of [`import_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Success,
    Error,
}

impl ImportStatus {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Report<'s> {
    Success { scene: &'s Scene },
    Error { message: String },
}

/// Import the root document of `files` with [`PostProcessSteps::IMPORT_FILE`].
///
/// Returns [`ImportError::InvalidArgument`] for an empty list. Any failure of
/// the import itself is logged and reported as [`ImportStatus::Error`].
///
/// # Example
///
/// ```
/// use meshport_core::{ImportStatus, import_file};
/// use meshport_vfs::VirtualFileList;
///
/// let mut files = VirtualFileList::new();
/// files.add_file("tri.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
/// assert_eq!(import_file(&files).unwrap(), ImportStatus::Success);
/// ```
pub fn import_file(files: &VirtualFileList) -> ImportResult<ImportStatus> {
    match import_scene(files) {
        Ok(_) => Ok(ImportStatus::Success),
        Err(err @ ImportError::InvalidArgument(_)) => Err(err),
        Err(err) => {
            log::error!("import failed: {err}");
            Ok(ImportStatus::Error)
        }
    }
}

/// Same import as [`import_file`], returning the scene itself.
pub fn import_scene(files: &VirtualFileList) -> ImportResult<Scene> {
    let root = files
        .root()
        .map(VirtualFile::path)
        .ok_or_else(|| ImportError::InvalidArgument("file list is empty".into()))?;

    let mut importer = Importer::new();
    importer.set_io_handler(VirtualFileSystem::new(files));
    importer.read_file(root, PostProcessSteps::IMPORT_FILE)?;
    importer.take_scene().ok_or(ImportError::EmptyScene)
}

/// Same import as [`import_file`], rendered as a JSON report.
///
/// The report is `{"status":"success","scene":{...}}` or
/// `{"status":"error","message":"..."}`.
pub fn import_file_to_json(files: &VirtualFileList) -> ImportResult<String> {
    let json = match import_scene(files) {
        Ok(scene) => serde_json::to_string(&Report::Success { scene: &scene })?,
        Err(err @ ImportError::InvalidArgument(_)) => return Err(err),
        Err(err) => {
            log::error!("import failed: {err}");
            serde_json::to_string(&Report::Error {
                message: err.to_string(),
            })?
        }
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(ImportStatus::Success.to_string(), "success");
        assert_eq!(ImportStatus::Error.to_string(), "error");
        assert!(ImportStatus::Success.is_success());
        assert!(!ImportStatus::Error.is_success());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ImportStatus::Error).unwrap(),
            r#""error""#
        );
    }

    #[test]
    fn empty_list_is_invalid_argument() {
        let files = VirtualFileList::new();
        assert!(matches!(
            import_file(&files),
            Err(ImportError::InvalidArgument(_))
        ));
        assert!(matches!(
            import_scene(&files),
            Err(ImportError::InvalidArgument(_))
        ));
        assert!(matches!(
            import_file_to_json(&files),
            Err(ImportError::InvalidArgument(_))
        ));
    }

    #[test]
    fn error_report_carries_message() {
        let mut files = VirtualFileList::new();
        files.add_file("readme.txt", "hello");
        let json: serde_json::Value =
            serde_json::from_str(&import_file_to_json(&files).unwrap()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "no loader for file: readme.txt");
    }
}
