//! Criterion micro-benchmarks for object chains.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera_bench::churn_schedule;
use tessera_slots::ObjectChain;

/// Benchmark: append 255 links, then release them all in shuffled order.
fn bench_chain_fill_release(c: &mut Criterion) {
    let order = churn_schedule(42, 255);

    c.bench_function("chain_fill_release_255", |b| {
        b.iter(|| {
            let mut chain = ObjectChain::new(256).unwrap();
            let links: Vec<_> = (0..255u16)
                .map(|i| chain.acquire_link_with(i).unwrap())
                .collect();
            for &i in &order {
                chain.release_link(links[i]);
            }
            black_box(chain.is_empty());
        });
    });
}

/// Benchmark: walk a full chain.
fn bench_chain_walk(c: &mut Criterion) {
    let mut chain = ObjectChain::new(256).unwrap();
    for i in 0..255u16 {
        chain.acquire_link_with(i).unwrap();
    }

    c.bench_function("chain_walk_255", |b| {
        b.iter(|| black_box(chain.iter().count()));
    });
}

criterion_group!(benches, bench_chain_fill_release, bench_chain_walk);
criterion_main!(benches);
