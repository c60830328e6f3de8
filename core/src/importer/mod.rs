//! The import engine.
//!
//! An [`Importer`] owns an installed [`IoSystem`] and a set of
//! [`FormatLoader`]s. [`Importer::read_file`] resolves every file through the
//! IO system, picks a loader by extension, validates the loaded scene and runs
//! the requested post-processing steps.

mod gltf;
mod obj;

use meshport_vfs::{IoSystem, path};

use crate::error::{ImportError, ImportResult};
use crate::postprocess::{self, PostProcessSteps};
use crate::scene::Scene;

pub use self::gltf::GltfLoader;
pub use self::obj::ObjLoader;

/// A scene file format the importer can read.
pub trait FormatLoader {
    /// Short format name used in log messages.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions handled by this loader, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Load the scene rooted at `path`.
    ///
    /// Every file, including side-cars, must be opened through `io`, and every
    /// stream opened must be closed before returning.
    fn load<'a>(&self, path: &str, io: &mut dyn IoSystem<'a>) -> ImportResult<Scene>;
}

/// Scene importer bound to an IO system.
pub struct Importer<'a> {
    io: Option<Box<dyn IoSystem<'a> + 'a>>,
    loaders: Vec<Box<dyn FormatLoader>>,
    scene: Option<Scene>,
    error: Option<String>,
}

impl<'a> Importer<'a> {
    /// Create an importer with the built-in OBJ and glTF loaders and no IO
    /// handler.
    pub fn new() -> Self {
        Self {
            io: None,
            loaders: vec![Box::new(ObjLoader), Box::new(GltfLoader)],
            scene: None,
            error: None,
        }
    }

    /// Install the IO system every file is read through, replacing any
    /// previous one.
    pub fn set_io_handler(&mut self, io: impl IoSystem<'a> + 'a) {
        self.io = Some(Box::new(io));
    }

    /// The installed IO system.
    pub fn io_handler(&self) -> Option<&(dyn IoSystem<'a> + 'a)> {
        self.io.as_deref()
    }

    /// Add a format loader. Later loaders take precedence for shared
    /// extensions.
    pub fn register_loader(&mut self, loader: impl FormatLoader + 'static) {
        self.loaders.insert(0, Box::new(loader));
    }

    /// Whether some loader handles the extension of `path`.
    pub fn can_read(&self, path: &str) -> bool {
        find_loader(&self.loaders, path).is_some()
    }

    /// Import the scene rooted at `path` and apply `steps`.
    ///
    /// On success the scene stays owned by the importer until
    /// [`take_scene`](Self::take_scene) or [`free_scene`](Self::free_scene).
    /// On failure any previous scene is discarded and the message is kept for
    /// [`error_string`](Self::error_string).
    pub fn read_file(&mut self, path: &str, steps: PostProcessSteps) -> ImportResult<&Scene> {
        self.scene = None;
        match self.load(path, steps) {
            Ok(scene) => {
                self.error = None;
                log::info!(
                    "imported {path}: {} mesh(es), {} material(s), {} face(s)",
                    scene.meshes.len(),
                    scene.materials.len(),
                    scene.face_count()
                );
                Ok(&*self.scene.insert(scene))
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// The most recently imported scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Move the imported scene out of the importer.
    pub fn take_scene(&mut self) -> Option<Scene> {
        self.scene.take()
    }

    /// Drop the imported scene.
    pub fn free_scene(&mut self) {
        self.scene = None;
    }

    /// Message of the last failed [`read_file`](Self::read_file), if any.
    pub fn error_string(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn load(&mut self, path: &str, steps: PostProcessSteps) -> ImportResult<Scene> {
        let Some(io) = self.io.as_deref_mut() else {
            return Err(ImportError::NoIoHandler);
        };
        if !io.exists(path) {
            return Err(ImportError::FileNotFound(path.to_string()));
        }

        let loader = find_loader(&self.loaders, path)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.to_string()))?;

        log::debug!("loading {path} with the {} loader", loader.name());
        let mut scene = loader.load(path, io)?;

        if scene.meshes.is_empty() {
            return Err(ImportError::EmptyScene);
        }
        scene.validate().map_err(ImportError::InvalidScene)?;

        postprocess::apply(&mut scene, steps);
        Ok(scene)
    }
}

fn find_loader<'l>(
    loaders: &'l [Box<dyn FormatLoader>],
    path: &str,
) -> Option<&'l dyn FormatLoader> {
    let ext = path::extension(path)?;
    loaders
        .iter()
        .find(|loader| loader.extensions().contains(&ext.as_str()))
        .map(|loader| &**loader)
}

impl Default for Importer<'_> {
    fn default() -> Self {
        Self::new()
    }
}
