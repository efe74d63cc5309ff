//! Criterion micro-benchmarks for cross-reference placement and removal.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera_bench::random_footprints;
use tessera_core::{ObjectId, TileCoord};
use tessera_test_utils::MockTileGrid;
use tessera_xref::CrossReferenceIndex;

/// Benchmark: place and remove one 3x3 footprint on an empty index.
fn bench_place_remove_3x3(c: &mut Criterion) {
    let mut index = CrossReferenceIndex::default();
    let mut grid = MockTileGrid::new();
    let footprint: Vec<TileCoord> = (0..3)
        .flat_map(|y| (0..3).map(move |x| TileCoord::new(x, y)))
        .collect();

    c.bench_function("xref_place_remove_3x3", |b| {
        b.iter(|| {
            let handle = index
                .place_object(ObjectId(1), &mut grid, black_box(&footprint))
                .unwrap();
            black_box(index.remove_object(handle, &mut grid));
        });
    });
}

/// Benchmark: placement that runs out of entries and rolls back.
fn bench_place_rollback(c: &mut Criterion) {
    let mut index = CrossReferenceIndex::new(64).unwrap();
    let mut grid = MockTileGrid::new();
    let footprint: Vec<TileCoord> = (0..64).map(|x| TileCoord::new(x, 0)).collect();

    c.bench_function("xref_place_rollback_63", |b| {
        b.iter(|| {
            let err = index.place_object(ObjectId(1), &mut grid, black_box(&footprint));
            black_box(err.is_err());
        });
    });
}

/// Benchmark: fill the default index with scattered footprints, then empty it.
fn bench_fill_and_drain(c: &mut Criterion) {
    let footprints = random_footprints(42, 400, 128, 128, 2);

    c.bench_function("xref_fill_drain_400", |b| {
        b.iter(|| {
            let mut index = CrossReferenceIndex::default();
            let mut grid = MockTileGrid::new();
            let handles: Vec<_> = footprints
                .iter()
                .enumerate()
                .filter_map(|(i, tiles)| {
                    index
                        .place_object(ObjectId(i as u16 + 1), &mut grid, tiles)
                        .ok()
                })
                .collect();
            for handle in handles {
                index.remove_object(handle, &mut grid);
            }
            black_box(index.free_len());
        });
    });
}

/// Benchmark: query owners on a crowded tile.
fn bench_owners_at_crowded(c: &mut Criterion) {
    let mut index = CrossReferenceIndex::default();
    let mut grid = MockTileGrid::new();
    let tile = TileCoord::new(5, 5);
    for owner in 1..=32 {
        index.place_object(ObjectId(owner), &mut grid, &[tile]).unwrap();
    }

    c.bench_function("xref_owners_at_32", |b| {
        b.iter(|| black_box(index.owners_at(&grid, black_box(tile)).count()));
    });
}

/// Benchmark: encode and decode the default-sized table.
fn bench_encode_decode(c: &mut Criterion) {
    let mut index = CrossReferenceIndex::default();
    let mut grid = MockTileGrid::new();
    for (i, tiles) in random_footprints(7, 200, 128, 128, 3).iter().enumerate() {
        let _ = index.place_object(ObjectId(i as u16 + 1), &mut grid, tiles);
    }
    let bytes = index.encode();

    c.bench_function("xref_encode_1600", |b| {
        b.iter(|| black_box(index.encode()));
    });
    c.bench_function("xref_decode_1600", |b| {
        b.iter(|| black_box(CrossReferenceIndex::decode_from(black_box(&bytes)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_place_remove_3x3,
    bench_place_rollback,
    bench_fill_and_drain,
    bench_owners_at_crowded,
    bench_encode_decode
);
criterion_main!(benches);
