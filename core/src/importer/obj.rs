//! Wavefront OBJ loader built on `tobj`.

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt::Write;
use std::path::Path;

use meshport_vfs::{IoSystem, path, read_to_end};

use super::FormatLoader;
use crate::error::{ImportError, ImportResult};
use crate::material::Material;
use crate::mesh::{Face, Mesh};
use crate::scene::{Scene, SceneNode};

/// Loads `.obj` documents and their `mtllib` material libraries.
///
/// Polygons are kept as they are and attributes are re-indexed into a single
/// index buffer. `p` statements become point faces and `l` polylines become
/// one line face per segment. A material library that cannot be opened or
/// parsed is logged and the scene is returned without materials.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl FormatLoader for ObjLoader {
    fn name(&self) -> &'static str {
        "obj"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn load<'a>(&self, path: &str, io: &mut dyn IoSystem<'a>) -> ImportResult<Scene> {
        let mut stream = io
            .open(path, "rb")
            .ok_or_else(|| ImportError::FileNotFound(path.to_string()))?;
        let data = read_to_end(&mut stream);
        io.close(stream)?;
        if data.is_empty() {
            return Err(ImportError::EmptyFile(path.to_string()));
        }
        let text = String::from_utf8_lossy(&data);
        let text = expand_points_and_polylines(&text);

        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ..Default::default()
        };

        let io = RefCell::new(io);
        let (models, materials) = tobj::load_obj_buf(&mut text.as_bytes(), &options, |reference| {
            load_material_library(&io, path, reference)
        })?;
        let io = io.into_inner();

        let materials = match materials {
            Ok(materials) => materials,
            Err(err) => {
                log::warn!("{path}: material library not loaded ({err}), skipping materials");
                Vec::new()
            }
        };

        let materials: Vec<Material> = materials.into_iter().map(convert_material).collect();
        for texture in materials.iter().flat_map(Material::textures) {
            if !io.exists(texture) {
                log::warn!("{path}: texture {texture} is not in the file list");
            }
        }

        let mut meshes = Vec::with_capacity(models.len());
        let mut children = Vec::with_capacity(models.len());
        for model in models {
            let name = model.name.clone();
            let Some(mesh) = convert_mesh(model, materials.len()) else {
                log::debug!("{path}: object {name:?} has no faces, skipped");
                continue;
            };
            children.push(
                SceneNode::new()
                    .with_name(name)
                    .with_meshes(vec![meshes.len()]),
            );
            meshes.push(mesh);
        }

        Ok(Scene::new()
            .with_root(
                SceneNode::new()
                    .with_name(path::file_name(path))
                    .with_children(children),
            )
            .with_meshes(meshes)
            .with_materials(materials))
    }
}

/// Rewrite the statements `tobj` does not split on its own.
///
/// `p v1 v2 ...` becomes one single-vertex `f` per vertex, which `tobj` loads
/// as a point. `l` with more than two vertices becomes one `l` per segment.
fn expand_points_and_polylines(text: &str) -> Cow<'_, str> {
    let needs_rewrite = text.lines().any(|line| {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("p") => true,
            Some("l") => words.count() > 2,
            _ => false,
        }
    });
    if !needs_rewrite {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("p") => {
                for vertex in words {
                    let _ = writeln!(out, "f {vertex}");
                }
            }
            Some("l") => {
                let vertices: Vec<&str> = words.collect();
                if vertices.len() > 2 {
                    for segment in vertices.windows(2) {
                        let _ = writeln!(out, "l {} {}", segment[0], segment[1]);
                    }
                } else {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            _ => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    Cow::Owned(out)
}

/// Open a `mtllib` reference through the IO system and parse it.
///
/// Texture paths are resolved against the library they come from.
fn load_material_library<'a>(
    io: &RefCell<&mut dyn IoSystem<'a>>,
    document: &str,
    reference: &Path,
) -> tobj::MTLLoadResult {
    let full = path::resolve_relative(document, &reference.to_string_lossy());
    let mut io = io.borrow_mut();
    let Some(mut stream) = io.open(&full, "rb") else {
        log::warn!("{document}: material library {full} not found");
        return Err(tobj::LoadError::OpenFileFailed);
    };

    let data = read_to_end(&mut stream);
    if let Err(err) = io.close(stream) {
        log::warn!("closing {full}: {err}");
    }

    let (mut materials, names) = tobj::load_mtl_buf(&mut data.as_slice())?;
    for mat in &mut materials {
        for texture in [
            &mut mat.ambient_texture,
            &mut mat.diffuse_texture,
            &mut mat.specular_texture,
            &mut mat.normal_texture,
            &mut mat.shininess_texture,
            &mut mat.dissolve_texture,
        ] {
            if let Some(tex) = texture.as_mut() {
                *tex = path::resolve_relative(&full, tex);
            }
        }
    }
    Ok((materials, names))
}

fn convert_mesh(model: tobj::Model, material_count: usize) -> Option<Mesh> {
    let src = model.mesh;

    let faces: Vec<Face> = if src.face_arities.is_empty() {
        src.indices.chunks_exact(3).map(Face::new).collect()
    } else {
        let mut start = 0usize;
        src.face_arities
            .iter()
            .filter_map(|&arity| {
                let end = start + arity as usize;
                let face = src.indices.get(start..end).map(Face::new);
                start = end;
                face
            })
            .collect()
    };
    if faces.is_empty() {
        return None;
    }

    let mut mesh = Mesh::new()
        .with_name(model.name)
        .with_positions(src.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect())
        .with_normals(src.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect())
        .with_tex_coords(src.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect())
        .with_faces(faces);
    if let Some(id) = src.material_id
        && id < material_count
    {
        mesh = mesh.with_material(id);
    }
    Some(mesh)
}

fn convert_material(src: tobj::Material) -> Material {
    let mut mat = Material::new(src.name);
    if let Some(diffuse) = src.diffuse {
        mat.diffuse_color = diffuse;
    }
    mat.ambient_color = src.ambient;
    mat.specular_color = src.specular;
    mat.shininess = src.shininess;
    mat.opacity = src.dissolve.unwrap_or(1.0);
    mat.diffuse_texture = src.diffuse_texture;
    mat.normal_texture = src.normal_texture;
    mat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PrimitiveTypes;
    use meshport_vfs::{VirtualFileList, VirtualFileSystem};

    const QUAD: &str = "\
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    fn load(list: &VirtualFileList, path: &str) -> (ImportResult<Scene>, usize) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut fs = VirtualFileSystem::new(list);
        let result = ObjLoader.load(path, &mut fs);
        (result, fs.open_streams())
    }

    #[test]
    fn polygon_is_preserved() {
        let mut list = VirtualFileList::new();
        list.add_file("quad.obj", QUAD);
        let (scene, open) = load(&list, "quad.obj");
        let scene = scene.unwrap();
        assert_eq!(open, 0);

        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name.as_deref(), Some("quad"));
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.has_normals());
        assert!(mesh.has_tex_coords());
        assert_eq!(mesh.faces, vec![Face::new([0, 1, 2, 3])]);
        assert_eq!(mesh.primitive_types, PrimitiveTypes::POLYGON);
        assert_eq!(scene.root.name.as_deref(), Some("quad.obj"));
        assert_eq!(scene.root.children[0].meshes, vec![0]);
    }

    #[test]
    fn material_library_is_resolved_next_to_document() {
        let mut list = VirtualFileList::new();
        list.add_file(
            "models/box.obj",
            "mtllib box.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n",
        );
        list.add_file(
            "models/box.mtl",
            "newmtl red\nKd 1 0 0\nNs 10\nd 0.5\nmap_Kd textures/red.png\n",
        );
        list.add_file("models/textures/red.png", Vec::new());

        let (scene, open) = load(&list, "models/box.obj");
        let scene = scene.unwrap();
        assert_eq!(open, 0);

        assert_eq!(scene.materials.len(), 1);
        let mat = &scene.materials[0];
        assert_eq!(mat.name, "red");
        assert_eq!(mat.diffuse_color, [1.0, 0.0, 0.0]);
        assert_eq!(mat.shininess, Some(10.0));
        assert_eq!(mat.opacity, 0.5);
        assert_eq!(
            mat.diffuse_texture.as_deref(),
            Some("models/textures/red.png")
        );
        assert_eq!(scene.meshes[0].material_index, Some(0));
    }

    #[test]
    fn missing_material_library_keeps_geometry() {
        let mut list = VirtualFileList::new();
        list.add_file(
            "tri.obj",
            "mtllib gone.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n",
        );
        let (scene, open) = load(&list, "tri.obj");
        let scene = scene.unwrap();
        assert_eq!(open, 0);
        assert!(scene.materials.is_empty());
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].material_index, None);
    }

    #[test]
    fn points_and_lines_are_loaded() {
        let mut list = VirtualFileList::new();
        list.add_file(
            "mixed.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 2 2 2\nf 1 2 3\nl 3 4\np 4\n",
        );
        let (scene, _) = load(&list, "mixed.obj");
        let scene = scene.unwrap();
        let mesh = &scene.meshes[0];
        assert_eq!(
            mesh.primitive_types,
            PrimitiveTypes::POINT | PrimitiveTypes::LINE | PrimitiveTypes::TRIANGLE
        );
    }

    #[test]
    fn point_lists_and_polylines_are_split() {
        let mut list = VirtualFileList::new();
        list.add_file(
            "wire.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\np 1 3\nl 1 2 3 4\n",
        );
        let (scene, open) = load(&list, "wire.obj");
        let scene = scene.unwrap();
        assert_eq!(open, 0);

        let mesh = &scene.meshes[0];
        assert_eq!(
            mesh.primitive_types,
            PrimitiveTypes::POINT | PrimitiveTypes::LINE
        );
        let arities: Vec<usize> = mesh.faces.iter().map(|f| f.indices.len()).collect();
        assert_eq!(arities, [1, 1, 2, 2, 2]);
    }

    #[test]
    fn rewrite_leaves_plain_documents_untouched() {
        assert!(matches!(
            expand_points_and_polylines(QUAD),
            Cow::Borrowed(_)
        ));
        assert!(matches!(
            expand_points_and_polylines("v 0 0 0\nv 1 0 0\nl 1 2\n"),
            Cow::Borrowed(_)
        ));
        assert_eq!(
            expand_points_and_polylines("p 1 -1\nl 1/1 2/2 3/3\n"),
            "f 1\nf -1\nl 1/1 2/2\nl 2/2 3/3\n"
        );
    }

    #[test]
    fn textures_resolve_against_their_own_library() {
        let mut list = VirtualFileList::new();
        list.add_file(
            "scene/room.obj",
            "mtllib walls/walls.mtl\nmtllib ../props/props.mtl\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl plaster\nf 1 2 3\n",
        );
        list.add_file("scene/walls/walls.mtl", "newmtl plaster\nmap_Kd plaster.png\n");
        list.add_file("props/props.mtl", "newmtl oak\nmap_Kd oak.png\nmap_Bump oak_n.png\n");

        let (scene, open) = load(&list, "scene/room.obj");
        let scene = scene.unwrap();
        assert_eq!(open, 0);

        let textures: Vec<(&str, Option<&str>, Option<&str>)> = scene
            .materials
            .iter()
            .map(|m| {
                (
                    m.name.as_str(),
                    m.diffuse_texture.as_deref(),
                    m.normal_texture.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            textures,
            [
                ("plaster", Some("scene/walls/plaster.png"), None),
                ("oak", Some("props/oak.png"), Some("props/oak_n.png")),
            ]
        );
    }

    #[test]
    fn empty_document_is_an_error() {
        let mut list = VirtualFileList::new();
        list.add_file("empty.obj", Vec::new());
        let (scene, open) = load(&list, "empty.obj");
        assert!(matches!(scene, Err(ImportError::EmptyFile(_))));
        assert_eq!(open, 0);
    }

    #[test]
    fn document_without_faces_has_no_meshes() {
        let mut list = VirtualFileList::new();
        list.add_file("junk.obj", "this is not a mesh\n");
        let (scene, open) = load(&list, "junk.obj");
        assert!(scene.unwrap().meshes.is_empty());
        assert_eq!(open, 0);
    }
}
