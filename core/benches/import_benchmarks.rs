use std::fmt::Write;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use meshport_core::mesh::{Face, Mesh};
use meshport_core::postprocess::{self, PostProcessSteps};
use meshport_core::scene::Scene;
use meshport_core::{import_file, import_scene};
use meshport_vfs::VirtualFileList;

/// OBJ text for an `n` x `n` grid of quads with normals and UVs.
fn grid_obj(n: usize) -> String {
    let mut obj = String::from("mtllib grid.mtl\no grid\n");
    for y in 0..=n {
        for x in 0..=n {
            let _ = writeln!(obj, "v {x} {y} 0");
            let _ = writeln!(obj, "vt {} {}", x as f32 / n as f32, y as f32 / n as f32);
        }
    }
    obj.push_str("vn 0 0 1\nusemtl grid\n");
    let row = n + 1;
    for y in 0..n {
        for x in 0..n {
            let a = y * row + x + 1;
            let (b, c, d) = (a + 1, a + row + 1, a + row);
            let _ = writeln!(obj, "f {a}/{a}/1 {b}/{b}/1 {c}/{c}/1 {d}/{d}/1");
        }
    }
    obj
}

fn grid_files(n: usize) -> VirtualFileList {
    let mut files = VirtualFileList::new();
    files.add_file("grid.obj", grid_obj(n));
    files.add_file("grid.mtl", "newmtl grid\nKd 0.8 0.8 0.8\n");
    files
}

fn grid_scene(n: usize) -> Scene {
    let row = n + 1;
    let mut positions = Vec::with_capacity(row * row);
    let mut tex_coords = Vec::with_capacity(row * row);
    for y in 0..=n {
        for x in 0..=n {
            positions.push([x as f32, y as f32, 0.0]);
            tex_coords.push([x as f32 / n as f32, y as f32 / n as f32]);
        }
    }
    let faces = (0..n)
        .flat_map(|y| (0..n).map(move |x| (y * row + x) as u32))
        .map(|a| {
            let row = row as u32;
            Face::new([a, a + 1, a + row + 1, a + row])
        })
        .collect();
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    Scene::new().with_meshes(vec![
        Mesh::new()
            .with_positions(positions)
            .with_normals(normals)
            .with_tex_coords(tex_coords)
            .with_faces(faces),
    ])
}

// ---------------------------------------------------------------------------
// Full import
// ---------------------------------------------------------------------------

fn bench_import_grid_32(c: &mut Criterion) {
    let files = grid_files(32);
    c.bench_function("import_obj_grid_32x32", |b| {
        b.iter(|| import_file(black_box(&files)).unwrap());
    });
}

fn bench_import_grid_128(c: &mut Criterion) {
    let files = grid_files(128);
    c.bench_function("import_scene_obj_grid_128x128", |b| {
        b.iter(|| black_box(import_scene(&files).unwrap()));
    });
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

fn bench_postprocess_grid_128(c: &mut Criterion) {
    let scene = grid_scene(128);
    c.bench_function("postprocess_import_file_grid_128x128", |b| {
        b.iter_batched(
            || scene.clone(),
            |mut scene| {
                postprocess::apply(&mut scene, PostProcessSteps::IMPORT_FILE);
                scene
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_join_vertices_grid_128(c: &mut Criterion) {
    let scene = grid_scene(128);
    c.bench_function("join_identical_vertices_grid_128x128", |b| {
        b.iter_batched(
            || scene.clone(),
            |mut scene| {
                postprocess::join_identical_vertices(&mut scene);
                scene
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_import_grid_32,
    bench_import_grid_128,
    bench_postprocess_grid_128,
    bench_join_vertices_grid_128,
);
criterion_main!(benches);
