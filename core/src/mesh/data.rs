//! CPU-side mesh data produced by importers.
//!
//! This module provides:
//! - [`PrimitiveTypes`] - Which kinds of primitives a mesh contains
//! - [`Face`] - One primitive as a list of vertex indices
//! - [`Mesh`] - Per-vertex attribute arrays plus faces

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Kinds of primitives present in a mesh.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct PrimitiveTypes: u32 {
        /// Single-index faces.
        const POINT = 1 << 0;
        /// Two-index faces.
        const LINE = 1 << 1;
        /// Three-index faces.
        const TRIANGLE = 1 << 2;
        /// Faces with more than three indices.
        const POLYGON = 1 << 3;
    }
}

impl PrimitiveTypes {
    /// Primitive type of a face with `index_count` indices.
    pub fn for_index_count(index_count: usize) -> Self {
        match index_count {
            0 => Self::empty(),
            1 => Self::POINT,
            2 => Self::LINE,
            3 => Self::TRIANGLE,
            _ => Self::POLYGON,
        }
    }
}

/// One primitive: indices into the owning mesh's vertex arrays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Face {
    /// Vertex indices, in winding order.
    pub indices: Vec<u32>,
}

impl Face {
    /// Create a face from its indices.
    pub fn new(indices: impl Into<Vec<u32>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    /// Primitive type implied by the index count.
    pub fn primitive_type(&self) -> PrimitiveTypes {
        PrimitiveTypes::for_index_count(self.indices.len())
    }
}

/// An imported mesh.
///
/// Vertex attributes are stored in parallel arrays. Optional attributes are
/// either empty or exactly as long as `positions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Mesh {
    /// Mesh name, if any.
    pub name: Option<String>,
    /// Primitive kinds used by `faces`.
    pub primitive_types: PrimitiveTypes,
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<[f32; 3]>,
    /// First texture coordinate channel.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tex_coords: Vec<[f32; 2]>,
    /// Vertex tangents.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tangents: Vec<[f32; 3]>,
    /// Vertex bitangents.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bitangents: Vec<[f32; 3]>,
    /// Primitives.
    pub faces: Vec<Face>,
    /// Index into [`Scene::materials`](crate::scene::Scene::materials).
    pub material_index: Option<usize>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mesh name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the positions.
    #[must_use]
    pub fn with_positions(mut self, positions: Vec<[f32; 3]>) -> Self {
        self.positions = positions;
        self
    }

    /// Set the normals.
    #[must_use]
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = normals;
        self
    }

    /// Set the texture coordinates.
    #[must_use]
    pub fn with_tex_coords(mut self, tex_coords: Vec<[f32; 2]>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Set the faces and recompute [`primitive_types`](Self::primitive_types).
    #[must_use]
    pub fn with_faces(mut self, faces: Vec<Face>) -> Self {
        self.faces = faces;
        self.update_primitive_types();
        self
    }

    /// Set the material index.
    #[must_use]
    pub fn with_material(mut self, material: usize) -> Self {
        self.material_index = Some(material);
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether every vertex has a normal.
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.positions.len()
    }

    /// Whether every vertex has a texture coordinate.
    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty() && self.tex_coords.len() == self.positions.len()
    }

    /// Whether tangents and bitangents are present.
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty() && self.tangents.len() == self.positions.len()
    }

    /// Recompute [`primitive_types`](Self::primitive_types) from the faces.
    pub fn update_primitive_types(&mut self) {
        self.primitive_types = self
            .faces
            .iter()
            .fold(PrimitiveTypes::empty(), |acc, face| acc | face.primitive_type());
    }

    /// Check that attribute arrays line up and that every index is in range.
    pub fn validate(&self) -> Result<(), String> {
        let count = self.positions.len();
        for (name, len) in [
            ("normals", self.normals.len()),
            ("tex_coords", self.tex_coords.len()),
            ("tangents", self.tangents.len()),
            ("bitangents", self.bitangents.len()),
        ] {
            if len != 0 && len != count {
                return Err(format!("{name} has {len} entries for {count} vertices"));
            }
        }

        for (i, face) in self.faces.iter().enumerate() {
            if face.indices.is_empty() {
                return Err(format!("face {i} has no indices"));
            }
            if let Some(&bad) = face.indices.iter().find(|&&idx| idx as usize >= count) {
                return Err(format!("face {i} references vertex {bad} of {count}"));
            }
        }
        Ok(())
    }
}
