//! Scene graph data types.
//!
//! All types use plain arrays (`[f32; 3]`, `[f32; 4]`, etc.) instead of
//! math library types so they serialize directly.

use serde::Serialize;

use crate::material::Material;
use crate::mesh::Mesh;

/// Node transform decomposed into translation, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeTransform {
    /// Translation [x, y, z].
    pub translation: [f32; 3],
    /// Rotation quaternion [x, y, z, w].
    pub rotation: [f32; 4],
    /// Scale [x, y, z].
    pub scale: [f32; 3],
}

impl NodeTransform {
    /// Identity transform: no translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0, 1.0, 1.0],
    };

    /// Returns this transform with a different translation.
    #[must_use]
    pub const fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: [f32; 4]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node in a scene graph tree.
///
/// Mesh references are indices into the owning [`Scene`]'s `meshes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    /// Node name, if any.
    pub name: Option<String>,
    /// Local transform relative to parent.
    pub transform: NodeTransform,
    /// Indices into [`Scene::meshes`].
    pub meshes: Vec<usize>,
    /// Child nodes forming the sub-tree.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates a new node with identity transform and no attachments.
    pub fn new() -> Self {
        Self {
            name: None,
            transform: NodeTransform::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the mesh indices.
    #[must_use]
    pub fn with_meshes(mut self, meshes: Vec<usize>) -> Self {
        self.meshes = meshes;
        self
    }

    /// Set the child nodes.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    /// Visit this node and all descendants, depth first.
    pub fn visit(&self, f: &mut impl FnMut(&SceneNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Mutable depth-first visit.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut SceneNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Number of nodes in this sub-tree, including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

/// An imported scene: a node tree plus the meshes and materials it uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Root of the node tree.
    pub root: SceneNode,
    /// All meshes referenced by nodes.
    pub meshes: Vec<Mesh>,
    /// Materials referenced by meshes.
    pub materials: Vec<Material>,
}

impl Scene {
    /// Creates an empty scene with an unnamed root node.
    pub fn new() -> Self {
        Self {
            root: SceneNode::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Set the root node.
    #[must_use]
    pub fn with_root(mut self, root: SceneNode) -> Self {
        self.root = root;
        self
    }

    /// Set the meshes.
    #[must_use]
    pub fn with_meshes(mut self, meshes: Vec<Mesh>) -> Self {
        self.meshes = meshes;
        self
    }

    /// Set the materials.
    #[must_use]
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    /// Total number of faces over all meshes.
    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.faces.len()).sum()
    }

    /// Total number of vertices over all meshes.
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    /// Check the scene for dangling references and malformed meshes.
    pub fn validate(&self) -> Result<(), String> {
        for (i, mesh) in self.meshes.iter().enumerate() {
            mesh.validate().map_err(|e| format!("mesh {i}: {e}"))?;
            if let Some(mat) = mesh.material_index
                && mat >= self.materials.len()
            {
                return Err(format!(
                    "mesh {i} references material {mat} of {}",
                    self.materials.len()
                ));
            }
        }

        let mut error = None;
        let mesh_count = self.meshes.len();
        self.root.visit(&mut |node| {
            if error.is_none()
                && let Some(&bad) = node.meshes.iter().find(|&&m| m >= mesh_count)
            {
                error = Some(format!("node references mesh {bad} of {mesh_count}"));
            }
        });
        error.map_or(Ok(()), Err)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
