//! # meshport core
//!
//! Scene import over an in-memory file list.
//!
//! The [`Importer`] pulls every file through an [`IoSystem`](meshport_vfs::IoSystem),
//! so a scene and its side-car resources never have to touch the disk. The
//! [`import_file`] family wraps the common case: put the root document and
//! its side-cars in a [`VirtualFileList`](meshport_vfs::VirtualFileList) and
//! import it in one call.
//!
//! ```
//! use meshport_core::import_scene;
//! use meshport_vfs::VirtualFileList;
//!
//! let mut files = VirtualFileList::new();
//! files.add_file("quad.obj", "mtllib quad.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nusemtl blue\nf 1 2 3 4\n");
//! files.add_file("quad.mtl", "newmtl blue\nKd 0 0 1\n");
//!
//! let scene = import_scene(&files).unwrap();
//! assert_eq!(scene.meshes[0].faces.len(), 2);
//! assert_eq!(scene.materials[0].name, "blue");
//! ```

mod error;
mod import;
pub mod importer;
pub mod material;
pub mod mesh;
pub mod postprocess;
pub mod scene;

pub use error::{ImportError, ImportResult};
pub use import::{ImportStatus, import_file, import_file_to_json, import_scene};
pub use importer::{FormatLoader, GltfLoader, Importer, ObjLoader};
pub use postprocess::PostProcessSteps;

pub use meshport_vfs;
