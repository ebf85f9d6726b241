//! Mesh building cost per level of detail.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use terrain::config::{MAP_CHUNK_SIZE, MAX_LEVEL_OF_DETAIL};
use terrain::height_curve::HeightCurve;
use terrain::mesh_data::build_terrain_mesh;
use terrain::noise_map::{generate_noise_map, NoiseParameters};

fn bench_build_mesh(c: &mut Criterion) {
    let map = generate_noise_map(MAP_CHUNK_SIZE, MAP_CHUNK_SIZE, &NoiseParameters::default());
    let curve = HeightCurve::default();

    let mut group = c.benchmark_group("terrain_mesh");
    for lod in [0, 1, 2, MAX_LEVEL_OF_DETAIL] {
        group.bench_with_input(BenchmarkId::new("lod", lod), &lod, |b, &lod| {
            b.iter(|| black_box(build_terrain_mesh(&map, 36.0, |h| curve.sample(h), lod)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_mesh);
criterion_main!(benches);
