use criterion::{Criterion, black_box, criterion_group, criterion_main};

use meshport_vfs::{IoStream, IoSystem, SeekOrigin, VirtualFileList, VirtualFileSystem};

fn file_list(count: usize, size: usize) -> VirtualFileList {
    (0..count)
        .map(|i| (format!("assets/file_{i}.bin"), vec![(i % 251) as u8; size]))
        .collect()
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

fn bench_lookup_last_of_64(c: &mut Criterion) {
    let files = file_list(64, 16);
    let fs = VirtualFileSystem::new(&files);
    c.bench_function("exists_last_of_64", |b| {
        b.iter(|| fs.exists(black_box("assets/file_63.bin")));
    });
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

fn bench_read_whole_1mb(c: &mut Criterion) {
    let files = file_list(1, 1 << 20);
    let mut fs = VirtualFileSystem::new(&files);
    let mut buf = vec![0u8; 1 << 20];
    c.bench_function("read_whole_1mb", |b| {
        b.iter(|| {
            let mut stream = fs.open("assets/file_0.bin", "rb").unwrap();
            let n = stream.read(&mut buf, 1, 1 << 20);
            fs.close(stream).unwrap();
            black_box(n)
        });
    });
}

fn bench_read_chunks_4k(c: &mut Criterion) {
    let files = file_list(1, 1 << 20);
    let mut fs = VirtualFileSystem::new(&files);
    let mut buf = [0u8; 4096];
    c.bench_function("read_chunks_4k", |b| {
        b.iter(|| {
            let mut stream = fs.open("assets/file_0.bin", "rb").unwrap();
            let mut total = 0;
            loop {
                let n = stream.read(&mut buf, 1, 4096);
                if n == 0 {
                    break;
                }
                total += n;
            }
            fs.close(stream).unwrap();
            black_box(total)
        });
    });
}

fn bench_seek_and_read(c: &mut Criterion) {
    let files = file_list(1, 1 << 16);
    let mut fs = VirtualFileSystem::new(&files);
    let mut buf = [0u8; 64];
    c.bench_function("seek_and_read_64b", |b| {
        let mut stream = fs.open("assets/file_0.bin", "rb").unwrap();
        b.iter(|| {
            stream.seek(black_box(128), SeekOrigin::End).unwrap();
            black_box(stream.read(&mut buf, 1, 64))
        });
        fs.close(stream).unwrap();
    });
}

criterion_group!(
    benches,
    bench_lookup_last_of_64,
    bench_read_whole_1mb,
    bench_read_chunks_4k,
    bench_seek_and_read,
);
criterion_main!(benches);
