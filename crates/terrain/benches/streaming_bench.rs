//! Streaming tick cost: a cold tick that generates the whole window, and a
//! warm tick where every chunk already exists.
//!
//! Run with: cargo bench -p terrain --features bench --bench streaming_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec2;
use terrain::settings::TerrainSettings;
use terrain::test_harness::TestTerrain;

fn bench_cold_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    group.sample_size(10);

    group.bench_function("cold_window", |b| {
        b.iter(|| black_box(TestTerrain::new().report()));
    });

    let mut terrain = TestTerrain::new();
    group.bench_function("warm_tick", |b| {
        b.iter(|| black_box(terrain.tick()));
    });

    // Alternate between two already-streamed positions so only visibility
    // toggles are measured.
    let mut terrain = TestTerrain::with_settings(TerrainSettings::default());
    let far = Vec2::new(240.0 * 5.0, 0.0);
    terrain.move_to(far);
    let mut at_origin = false;
    group.bench_function("revisit_tick", |b| {
        b.iter(|| {
            at_origin = !at_origin;
            let target = if at_origin { Vec2::ZERO } else { far };
            black_box(terrain.move_to(target))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cold_tick);
criterion_main!(benches);
