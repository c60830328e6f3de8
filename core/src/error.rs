//! Import error type.

use meshport_vfs::VfsError;
use thiserror::Error;

/// Errors that can occur while importing a scene.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no IO handler installed")]
    NoIoHandler,
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("no loader for file: {0}")]
    UnsupportedFormat(String),
    #[error("file is empty: {0}")]
    EmptyFile(String),
    #[error("scene contains no meshes")]
    EmptyScene,
    #[error("invalid scene: {0}")]
    InvalidScene(String),
    #[error("OBJ parse error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("glTF parse error: {0}")]
    Gltf(#[from] gltf_dep::Error),
    #[error("mesh {mesh} primitive {primitive} has no readable POSITION data")]
    MissingPositions { mesh: usize, primitive: usize },
    #[error("buffer error: {0}")]
    Buffer(String),
    #[error(transparent)]
    Vfs(#[from] VfsError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
