use std::collections::HashMap;

use crate::mesh::Mesh;
use crate::scene::Scene;

/// Merge vertices whose attributes are bit-identical and reindex faces.
///
/// Comparison is exact on the `f32` bit patterns, so `0.0` and `-0.0` are
/// considered different vertices.
pub fn join_identical_vertices(scene: &mut Scene) {
    let mut before = 0usize;
    let mut after = 0usize;

    for mesh in &mut scene.meshes {
        before += mesh.vertex_count();
        join_mesh(mesh);
        after += mesh.vertex_count();
    }

    log::debug!("join_identical_vertices: {before} -> {after} vertices");
}

fn join_mesh(mesh: &mut Mesh) {
    let count = mesh.vertex_count();
    let has_normals = mesh.has_normals();
    let has_tex_coords = mesh.has_tex_coords();
    let has_tangents = mesh.has_tangents() && mesh.bitangents.len() == count;

    let mut unique: HashMap<Vec<u32>, u32> = HashMap::with_capacity(count);
    let mut remap = Vec::with_capacity(count);
    let mut kept = Vec::new();

    for v in 0..count {
        let key = vertex_key(mesh, v, has_normals, has_tex_coords, has_tangents);
        let next = kept.len() as u32;
        let index = *unique.entry(key).or_insert_with(|| {
            kept.push(v);
            next
        });
        remap.push(index);
    }

    if kept.len() == count {
        return;
    }

    mesh.positions = kept.iter().map(|&v| mesh.positions[v]).collect();
    if has_normals {
        mesh.normals = kept.iter().map(|&v| mesh.normals[v]).collect();
    }
    if has_tex_coords {
        mesh.tex_coords = kept.iter().map(|&v| mesh.tex_coords[v]).collect();
    }
    if has_tangents {
        mesh.tangents = kept.iter().map(|&v| mesh.tangents[v]).collect();
        mesh.bitangents = kept.iter().map(|&v| mesh.bitangents[v]).collect();
    }
    for face in &mut mesh.faces {
        for index in &mut face.indices {
            *index = remap[*index as usize];
        }
    }
}

fn vertex_key(
    mesh: &Mesh,
    v: usize,
    has_normals: bool,
    has_tex_coords: bool,
    has_tangents: bool,
) -> Vec<u32> {
    let mut key = Vec::with_capacity(14);
    key.extend(mesh.positions[v].iter().map(|f| f.to_bits()));
    if has_normals {
        key.extend(mesh.normals[v].iter().map(|f| f.to_bits()));
    }
    if has_tex_coords {
        key.extend(mesh.tex_coords[v].iter().map(|f| f.to_bits()));
    }
    if has_tangents {
        key.extend(mesh.tangents[v].iter().map(|f| f.to_bits()));
        key.extend(mesh.bitangents[v].iter().map(|f| f.to_bits()));
    }
    key
}
