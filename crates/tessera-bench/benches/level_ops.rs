//! Criterion benchmarks for whole-level editing and save images.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera_bench::{churn_schedule, random_footprints, reference_level, REFERENCE_CLASSES};
use tessera_level::Level;

/// Benchmark: spawn 300 objects, then despawn them in shuffled order.
fn bench_level_churn(c: &mut Criterion) {
    let footprints = random_footprints(42, 300, 128, 128, 2);
    let order = churn_schedule(42, 300);

    c.bench_function("level_spawn_despawn_300", |b| {
        b.iter(|| {
            let mut level = Level::new(reference_level()).unwrap();
            let ids: Vec<_> = footprints
                .iter()
                .enumerate()
                .map(|(i, tiles)| {
                    level
                        .spawn(REFERENCE_CLASSES[i % REFERENCE_CLASSES.len()], tiles)
                        .ok()
                })
                .collect();
            for &i in &order {
                if let Some(id) = ids[i] {
                    level.despawn(id).unwrap();
                }
            }
            black_box(level.object_count());
        });
    });
}

/// Benchmark: encode a populated level and decode it with verification.
fn bench_level_image(c: &mut Criterion) {
    let mut level = Level::new(reference_level()).unwrap();
    for (i, tiles) in random_footprints(9, 300, 128, 128, 2).iter().enumerate() {
        let _ = level.spawn(REFERENCE_CLASSES[i % REFERENCE_CLASSES.len()], tiles);
    }
    let image = level.encode();

    c.bench_function("level_encode", |b| {
        b.iter(|| black_box(level.encode()));
    });
    c.bench_function("level_decode_verify", |b| {
        b.iter(|| black_box(Level::decode(reference_level(), black_box(&image)).unwrap()));
    });
}

criterion_group!(benches, bench_level_churn, bench_level_image);
criterion_main!(benches);
