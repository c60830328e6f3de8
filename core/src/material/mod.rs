//! Imported material description.

use serde::Serialize;

/// Surface properties shared by every supported format.
///
/// Texture fields hold logical paths resolved against the document that
/// referenced them, ready to be looked up in the same file list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Diffuse / base color (linear RGB).
    pub diffuse_color: [f32; 3],
    /// Ambient color, if the format defines one.
    pub ambient_color: Option<[f32; 3]>,
    /// Specular color, if the format defines one.
    pub specular_color: Option<[f32; 3]>,
    /// Specular exponent, if the format defines one.
    pub shininess: Option<f32>,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Whether back faces are rendered.
    pub double_sided: bool,
    /// Diffuse / base color texture path.
    pub diffuse_texture: Option<String>,
    /// Normal map path.
    pub normal_texture: Option<String>,
}

impl Material {
    /// Create a white, opaque material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse_color: [1.0, 1.0, 1.0],
            ambient_color: None,
            specular_color: None,
            shininess: None,
            opacity: 1.0,
            double_sided: false,
            diffuse_texture: None,
            normal_texture: None,
        }
    }

    /// Texture paths referenced by this material.
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        self.diffuse_texture
            .iter()
            .chain(self.normal_texture.iter())
            .map(String::as_str)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default")
    }
}
