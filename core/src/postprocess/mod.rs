//! Post-processing steps applied to a freshly loaded scene.
//!
//! Steps are selected with [`PostProcessSteps`] and always run in a fixed
//! order regardless of flag order:
//!
//! 1. [`TRIANGULATE`](PostProcessSteps::TRIANGULATE)
//! 2. [`SORT_BY_PTYPE`](PostProcessSteps::SORT_BY_PTYPE)
//! 3. [`CALC_TANGENT_SPACE`](PostProcessSteps::CALC_TANGENT_SPACE)
//! 4. [`JOIN_IDENTICAL_VERTICES`](PostProcessSteps::JOIN_IDENTICAL_VERTICES)

mod join_vertices;
mod sort_by_ptype;
mod tangents;
mod triangulate;

use bitflags::bitflags;

use crate::scene::Scene;

pub use join_vertices::join_identical_vertices;
pub use sort_by_ptype::sort_by_primitive_type;
pub use tangents::calc_tangent_space;
pub use triangulate::triangulate;

bitflags! {
    /// Post-processing steps requested from the importer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcessSteps: u32 {
        /// Compute per-vertex tangents and bitangents.
        const CALC_TANGENT_SPACE = 1 << 0;
        /// Merge vertices whose attributes are bit-identical.
        const JOIN_IDENTICAL_VERTICES = 1 << 1;
        /// Split polygons into triangles.
        const TRIANGULATE = 1 << 3;
        /// Split meshes so each holds a single primitive type.
        const SORT_BY_PTYPE = 1 << 15;

        /// The fixed set used by [`import_file`](crate::import_file).
        const IMPORT_FILE = Self::CALC_TANGENT_SPACE.bits()
            | Self::TRIANGULATE.bits()
            | Self::JOIN_IDENTICAL_VERTICES.bits()
            | Self::SORT_BY_PTYPE.bits();
    }
}

impl Default for PostProcessSteps {
    fn default() -> Self {
        Self::empty()
    }
}

/// Run the requested steps on `scene`.
pub fn apply(scene: &mut Scene, steps: PostProcessSteps) {
    if steps.contains(PostProcessSteps::TRIANGULATE) {
        triangulate(scene);
    }
    if steps.contains(PostProcessSteps::SORT_BY_PTYPE) {
        sort_by_primitive_type(scene);
    }
    if steps.contains(PostProcessSteps::CALC_TANGENT_SPACE) {
        calc_tangent_space(scene);
    }
    if steps.contains(PostProcessSteps::JOIN_IDENTICAL_VERTICES) {
        join_identical_vertices(scene);
    }
}
