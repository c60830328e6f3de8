use crate::mesh::{Face, Mesh, PrimitiveTypes};
use crate::scene::Scene;

/// Primitive kinds in the order split meshes are emitted.
const ORDER: [PrimitiveTypes; 4] = [
    PrimitiveTypes::POINT,
    PrimitiveTypes::LINE,
    PrimitiveTypes::TRIANGLE,
    PrimitiveTypes::POLYGON,
];

/// Split every mesh holding more than one primitive type into one mesh per
/// type, and remap node mesh references accordingly.
///
/// Each split mesh only keeps the vertices its faces use.
pub fn sort_by_primitive_type(scene: &mut Scene) {
    let mut meshes = Vec::with_capacity(scene.meshes.len());
    // Old mesh index -> new mesh indices.
    let mut remap: Vec<Vec<usize>> = Vec::with_capacity(scene.meshes.len());
    let mut split = 0usize;

    for mesh in scene.meshes.drain(..) {
        if mesh.primitive_types.bits().count_ones() <= 1 {
            remap.push(vec![meshes.len()]);
            meshes.push(mesh);
            continue;
        }

        split += 1;
        let mut targets = Vec::new();
        for kind in ORDER {
            if !mesh.primitive_types.contains(kind) {
                continue;
            }
            targets.push(meshes.len());
            meshes.push(extract(&mesh, kind));
        }
        remap.push(targets);
    }

    scene.meshes = meshes;
    if split > 0 {
        scene.root.visit_mut(&mut |node| {
            node.meshes = node
                .meshes
                .iter()
                .flat_map(|&old| remap.get(old).into_iter().flatten().copied())
                .collect();
        });
    }

    log::debug!("sort_by_ptype: split {split} mesh(es) with mixed primitive types");
}

/// Copy the faces of `mesh` whose type is `kind`, compacting vertices.
fn extract(mesh: &Mesh, kind: PrimitiveTypes) -> Mesh {
    let mut vertex_map = vec![u32::MAX; mesh.vertex_count()];
    let mut out = Mesh {
        name: mesh.name.clone(),
        material_index: mesh.material_index,
        ..Mesh::default()
    };

    for face in mesh.faces.iter().filter(|f| f.primitive_type() == kind) {
        let indices = face
            .indices
            .iter()
            .map(|&old| {
                let old = old as usize;
                if vertex_map[old] == u32::MAX {
                    vertex_map[old] = out.positions.len() as u32;
                    copy_vertex(mesh, old, &mut out);
                }
                vertex_map[old]
            })
            .collect::<Vec<_>>();
        out.faces.push(Face::new(indices));
    }

    out.update_primitive_types();
    out
}

fn copy_vertex(from: &Mesh, index: usize, to: &mut Mesh) {
    to.positions.push(from.positions[index]);
    if from.has_normals() {
        to.normals.push(from.normals[index]);
    }
    if from.has_tex_coords() {
        to.tex_coords.push(from.tex_coords[index]);
    }
    if from.has_tangents() && from.bitangents.len() == from.positions.len() {
        to.tangents.push(from.tangents[index]);
        to.bitangents.push(from.bitangents[index]);
    }
}
