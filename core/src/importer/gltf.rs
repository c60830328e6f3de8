//! glTF 2.0 loader built on the `gltf` crate.
//!
//! Handles `.gltf` (JSON) and `.glb` (binary) documents. Buffers come from
//! the GLB blob, base64 data URIs, or side-car files opened through the IO
//! system.

use std::borrow::Cow;

use gltf_dep::mesh::Mode;
use meshport_vfs::{IoStream, IoSystem, StreamReader, path, read_to_end};

use super::FormatLoader;
use crate::error::{ImportError, ImportResult};
use crate::material::Material;
use crate::mesh::{Face, Mesh};
use crate::scene::{NodeTransform, Scene, SceneNode};

/// Loads `.gltf` and `.glb` documents.
///
/// Every glTF primitive becomes one [`Mesh`]. Strips, fans and loops are
/// expanded to plain lists while loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

impl FormatLoader for GltfLoader {
    fn name(&self) -> &'static str {
        "gltf"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gltf", "glb"]
    }

    fn load<'a>(&self, path: &str, io: &mut dyn IoSystem<'a>) -> ImportResult<Scene> {
        let stream = io
            .open(path, "rb")
            .ok_or_else(|| ImportError::FileNotFound(path.to_string()))?;
        if stream.file_size() == 0 {
            io.close(stream)?;
            return Err(ImportError::EmptyFile(path.to_string()));
        }

        let mut reader = StreamReader::new(stream);
        let parsed = gltf_dep::Gltf::from_reader(&mut reader);
        io.close(reader.into_inner())?;
        let gltf_dep::Gltf { document, blob } = parsed?;

        let buffers = resolve_buffers(&document, blob, path, io)?;
        let materials = load_materials(&document, path, &*io);
        let (meshes, mesh_index_map) = load_meshes(&document, &buffers)?;
        let root = load_root(&document, path, &mesh_index_map, meshes.len());

        Ok(Scene::new()
            .with_root(root)
            .with_meshes(meshes)
            .with_materials(materials))
    }
}

/// Resolve the bytes of every buffer in the document.
fn resolve_buffers<'a>(
    document: &gltf_dep::Document,
    mut blob: Option<Vec<u8>>,
    path: &str,
    io: &mut dyn IoSystem<'a>,
) -> ImportResult<Vec<Vec<u8>>> {
    let mut buffers = Vec::new();

    for buffer in document.buffers() {
        let data = match buffer.source() {
            gltf_dep::buffer::Source::Bin => blob.take().ok_or_else(|| {
                ImportError::Buffer("binary buffer referenced but no blob present".into())
            })?,
            gltf_dep::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                parse_data_uri(uri).ok_or_else(|| {
                    ImportError::Buffer(format!(
                        "buffer {} has a malformed data URI",
                        buffer.index()
                    ))
                })?
            }
            gltf_dep::buffer::Source::Uri(uri) => read_side_car(path, uri, io)?,
        };

        if data.len() < buffer.length() {
            return Err(ImportError::Buffer(format!(
                "buffer {} holds {} bytes, {} declared",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffers.push(data);
    }

    Ok(buffers)
}

/// Read a file referenced by `uri` relative to `document`.
fn read_side_car<'a>(
    document: &str,
    uri: &str,
    io: &mut dyn IoSystem<'a>,
) -> ImportResult<Vec<u8>> {
    let full = path::resolve_relative(document, &decode_uri(uri));
    let mut stream = io
        .open(&full, "rb")
        .ok_or_else(|| ImportError::FileNotFound(full.clone()))?;
    let data = read_to_end(&mut stream);
    io.close(stream)?;
    log::trace!("{document}: read side-car {full} ({} bytes)", data.len());
    Ok(data)
}

fn load_materials(
    document: &gltf_dep::Document,
    path: &str,
    io: &dyn IoSystem<'_>,
) -> Vec<Material> {
    document
        .materials()
        .enumerate()
        .map(|(i, src)| {
            let pbr = src.pbr_metallic_roughness();
            let [r, g, b, a] = pbr.base_color_factor();

            let mut mat = Material::new(
                src.name()
                    .map_or_else(|| format!("material_{i}"), String::from),
            );
            mat.diffuse_color = [r, g, b];
            mat.opacity = a;
            mat.double_sided = src.double_sided();
            mat.diffuse_texture = pbr
                .base_color_texture()
                .map(|info| texture_path(&info.texture(), path, io));
            mat.normal_texture = src
                .normal_texture()
                .map(|normal| texture_path(&normal.texture(), path, io));
            mat
        })
        .collect()
}

/// Logical path of the image behind `texture`.
///
/// Embedded images are named `*<image index>`.
fn texture_path(
    texture: &gltf_dep::Texture<'_>,
    document: &str,
    io: &dyn IoSystem<'_>,
) -> String {
    let image = texture.source();
    match image.source() {
        gltf_dep::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
            let full = path::resolve_relative(document, &decode_uri(uri));
            if !io.exists(&full) {
                log::warn!("{document}: image {full} is not in the file list");
            }
            full
        }
        _ => format!("*{}", image.index()),
    }
}

/// Load every primitive as a mesh.
///
/// Also returns a map from glTF mesh index to the flat mesh indices of its
/// primitives.
fn load_meshes(
    document: &gltf_dep::Document,
    buffers: &[Vec<u8>],
) -> ImportResult<(Vec<Mesh>, Vec<Vec<usize>>)> {
    let mut meshes = Vec::new();
    let mut index_map = Vec::new();

    for (mesh_idx, src) in document.meshes().enumerate() {
        let primitive_count = src.primitives().len();
        let mut flat_indices = Vec::with_capacity(primitive_count);

        for (prim_idx, primitive) in src.primitives().enumerate() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or(ImportError::MissingPositions {
                    mesh: mesh_idx,
                    primitive: prim_idx,
                })?
                .collect();
            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|normals| normals.collect())
                .unwrap_or_default();
            let tex_coords: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|uvs| uvs.into_f32().collect())
                .unwrap_or_default();
            let indices: Vec<u32> = match (primitive.indices(), reader.read_indices()) {
                (_, Some(indices)) => indices.into_u32().collect(),
                (None, None) => (0..positions.len() as u32).collect(),
                (Some(accessor), None) => {
                    return Err(ImportError::Buffer(format!(
                        "mesh {mesh_idx} primitive {prim_idx}: index accessor {} is out of range",
                        accessor.index()
                    )));
                }
            };

            let mut mesh = Mesh::new()
                .with_positions(positions)
                .with_normals(normals)
                .with_tex_coords(tex_coords)
                .with_faces(faces_for_mode(primitive.mode(), &indices));
            mesh.name = src.name().map(|name| {
                if primitive_count > 1 {
                    format!("{name}_prim{prim_idx}")
                } else {
                    name.to_string()
                }
            });
            if let Some(material) = primitive.material().index() {
                mesh = mesh.with_material(material);
            }

            flat_indices.push(meshes.len());
            meshes.push(mesh);
        }

        index_map.push(flat_indices);
    }

    Ok((meshes, index_map))
}

/// Build faces from an index list according to the primitive mode.
fn faces_for_mode(mode: Mode, indices: &[u32]) -> Vec<Face> {
    match mode {
        Mode::Points => indices.iter().map(|&i| Face::new([i])).collect(),
        Mode::Lines => indices.chunks_exact(2).map(Face::new).collect(),
        Mode::LineStrip => indices.windows(2).map(Face::new).collect(),
        Mode::LineLoop => {
            let mut faces: Vec<Face> = indices.windows(2).map(Face::new).collect();
            if indices.len() > 2 {
                faces.push(Face::new([indices[indices.len() - 1], indices[0]]));
            }
            faces
        }
        Mode::Triangles => indices.chunks_exact(3).map(Face::new).collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, w)| {
                // Odd triangles swap the first two corners to keep winding.
                if i % 2 == 0 {
                    Face::new([w[0], w[1], w[2]])
                } else {
                    Face::new([w[1], w[0], w[2]])
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&first, rest)) => rest
                .windows(2)
                .map(|w| Face::new([first, w[0], w[1]]))
                .collect(),
            None => Vec::new(),
        },
    }
}

/// Build the node tree of the default scene, or of the first one.
///
/// Documents without scenes get a root that references every mesh.
fn load_root(
    document: &gltf_dep::Document,
    path: &str,
    mesh_index_map: &[Vec<usize>],
    mesh_count: usize,
) -> SceneNode {
    let root = SceneNode::new().with_name(path::file_name(path));
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => root.with_children(
            scene
                .nodes()
                .map(|node| load_node(&node, mesh_index_map))
                .collect(),
        ),
        None => root.with_meshes((0..mesh_count).collect()),
    }
}

fn load_node(node: &gltf_dep::Node<'_>, mesh_index_map: &[Vec<usize>]) -> SceneNode {
    let (translation, rotation, scale) = node.transform().decomposed();

    let meshes = node
        .mesh()
        .and_then(|m| mesh_index_map.get(m.index()).cloned())
        .unwrap_or_default();

    let mut out = SceneNode::new()
        .with_transform(NodeTransform {
            translation,
            rotation,
            scale,
        })
        .with_meshes(meshes)
        .with_children(
            node.children()
                .map(|child| load_node(&child, mesh_index_map))
                .collect(),
        );
    out.name = node.name().map(String::from);
    out
}

/// Percent-decode a relative URI into a file list path.
fn decode_uri(uri: &str) -> Cow<'_, str> {
    urlencoding::decode(uri).unwrap_or_else(|err| {
        log::warn!("URI {uri:?} does not decode to UTF-8 ({err}), using it as is");
        Cow::Borrowed(uri)
    })
}

/// Decode a `data:<mime>;base64,<payload>` URI.
fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let start = rest.find(";base64,")?;
    base64_decode(&rest[start + 8..])
}

fn base64_decode(input: &str) -> Option<Vec<u8>> {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn decode_char(c: u8) -> Option<u8> {
        TABLE.iter().position(|&b| b == c).map(|p| p as u8)
    }

    let input: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    for chunk in input.chunks(4) {
        if chunk.len() < 2 {
            return None;
        }
        let mut buf = [0u8; 4];
        let mut pad = 4 - chunk.len();

        for (i, &byte) in chunk.iter().enumerate() {
            if byte == b'=' {
                if i < 2 {
                    return None;
                }
                pad += 1;
            } else if pad > 4 - chunk.len() {
                // Data after padding.
                return None;
            } else {
                buf[i] = decode_char(byte)?;
            }
        }

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if pad < 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if pad < 1 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}
