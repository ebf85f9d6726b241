//! Noise sampling throughput for one chunk map.
//!
//! Run with: cargo bench -p terrain --bench noise_bench

use bevy::math::Vec2;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use terrain::config::MAP_CHUNK_SIZE;
use terrain::noise_map::{NoiseFieldGenerator, NoiseParameters, NormalizeMode};
use terrain::regions::{classify, default_regions};

// ---------------------------------------------------------------------------
// Heightmap generation
// ---------------------------------------------------------------------------

fn bench_generate_chunk_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_map");
    group.sample_size(20);

    for octaves in [1, 3, 6] {
        let params = NoiseParameters {
            octave_count: octaves,
            ..NoiseParameters::default()
        };
        let generator = NoiseFieldGenerator::new(&params, NormalizeMode::Global);
        group.bench_with_input(BenchmarkId::new("octaves", octaves), &octaves, |b, _| {
            b.iter(|| {
                black_box(generator.generate_at(
                    MAP_CHUNK_SIZE,
                    MAP_CHUNK_SIZE,
                    black_box(Vec2::new(240.0, -480.0)),
                ))
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Region classification
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let generator = NoiseFieldGenerator::new(&NoiseParameters::default(), NormalizeMode::Global);
    let map = generator.generate(MAP_CHUNK_SIZE, MAP_CHUNK_SIZE);
    let regions = default_regions();

    c.bench_function("classify_chunk", |b| {
        b.iter(|| black_box(classify(black_box(&map), &regions)));
    });
}

criterion_group!(benches, bench_generate_chunk_map, bench_classify);
criterion_main!(benches);
