use crate::mesh::Face;
use crate::scene::Scene;

/// Replace every polygon (more than three indices) with a triangle fan.
///
/// The fan is anchored at the first index, which is exact for convex
/// polygons. Points, lines and triangles are kept as they are.
pub fn triangulate(scene: &mut Scene) {
    let mut split = 0usize;

    for mesh in &mut scene.meshes {
        if !mesh.faces.iter().any(|f| f.indices.len() > 3) {
            continue;
        }

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in mesh.faces.drain(..) {
            if face.indices.len() <= 3 {
                faces.push(face);
                continue;
            }
            split += 1;
            let first = face.indices[0];
            for pair in face.indices[1..].windows(2) {
                faces.push(Face::new([first, pair[0], pair[1]]));
            }
        }
        mesh.faces = faces;
        mesh.update_primitive_types();
    }

    log::debug!("triangulate: split {split} polygon(s)");
}
