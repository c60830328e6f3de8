use nalgebra::Vector3;

use crate::mesh::Mesh;
use crate::scene::Scene;

type Vec3 = Vector3<f32>;

const EPSILON: f32 = 1e-8;

/// Compute per-vertex tangents and bitangents from triangle UV gradients.
///
/// Meshes without normals, texture coordinates or triangles are skipped.
/// Tangents are orthogonalized against the vertex normal and the bitangent
/// carries the handedness of the UV mapping.
pub fn calc_tangent_space(scene: &mut Scene) {
    let mut computed = 0usize;

    for (index, mesh) in scene.meshes.iter_mut().enumerate() {
        if !mesh.has_normals() || !mesh.has_tex_coords() {
            log::debug!("calc_tangent_space: mesh {index} lacks normals or UVs, skipped");
            continue;
        }
        if !mesh.faces.iter().any(|f| f.indices.len() == 3) {
            log::debug!("calc_tangent_space: mesh {index} has no triangles, skipped");
            continue;
        }
        compute_mesh(mesh);
        computed += 1;
    }

    log::debug!("calc_tangent_space: processed {computed} mesh(es)");
}

fn compute_mesh(mesh: &mut Mesh) {
    let count = mesh.vertex_count();
    let mut tan = vec![Vec3::zeros(); count];
    let mut bitan = vec![Vec3::zeros(); count];
    let mut used = vec![false; count];

    for face in mesh.faces.iter().filter(|f| f.indices.len() == 3) {
        let [a, b, c] = [
            face.indices[0] as usize,
            face.indices[1] as usize,
            face.indices[2] as usize,
        ];
        let p0 = Vec3::from(mesh.positions[a]);
        let e1 = Vec3::from(mesh.positions[b]) - p0;
        let e2 = Vec3::from(mesh.positions[c]) - p0;

        let uv0 = mesh.tex_coords[a];
        let (du1, dv1) = (mesh.tex_coords[b][0] - uv0[0], mesh.tex_coords[b][1] - uv0[1]);
        let (du2, dv2) = (mesh.tex_coords[c][0] - uv0[0], mesh.tex_coords[c][1] - uv0[1]);

        for v in [a, b, c] {
            used[v] = true;
        }

        let det = du1 * dv2 - du2 * dv1;
        if det.abs() < EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * dv2 - e2 * dv1) * r;
        let tdir = (e2 * du1 - e1 * du2) * r;

        for v in [a, b, c] {
            tan[v] += sdir;
            bitan[v] += tdir;
        }
    }

    mesh.tangents = Vec::with_capacity(count);
    mesh.bitangents = Vec::with_capacity(count);
    for v in 0..count {
        if !used[v] {
            mesh.tangents.push([0.0; 3]);
            mesh.bitangents.push([0.0; 3]);
            continue;
        }

        let n = Vec3::from(mesh.normals[v]).try_normalize(EPSILON).unwrap_or(Vec3::z());
        let t = (tan[v] - n * n.dot(&tan[v]))
            .try_normalize(EPSILON)
            .unwrap_or_else(|| perpendicular(&n));
        let handedness = if n.cross(&t).dot(&bitan[v]) < 0.0 { -1.0 } else { 1.0 };
        let b = n.cross(&t) * handedness;

        mesh.tangents.push(t.into());
        mesh.bitangents.push(b.into());
    }
}

/// Any unit vector orthogonal to `n`.
fn perpendicular(n: &Vec3) -> Vec3 {
    let axis = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    (axis - n * n.dot(&axis)).normalize()
}
