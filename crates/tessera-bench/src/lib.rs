//! Benchmark workloads for the Tessera level tables.
//!
//! Provides seeded, reproducible inputs for the criterion benches:
//!
//! - [`reference_level`]: 128x128 map with the standard table capacities
//! - [`random_footprints`]: rectangular footprints scattered over a map
//! - [`churn_schedule`]: a despawn order that interleaves with respawns

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::{ClassId, TileCoord};
use tessera_level::LevelConfig;

/// Classes registered by [`reference_level`].
pub const REFERENCE_CLASSES: [ClassId; 4] = [ClassId(1), ClassId(2), ClassId(3), ClassId(4)];

/// A 128x128 level with default cross-reference and object capacities and
/// four classes of 256 chain slots each.
pub fn reference_level() -> LevelConfig {
    REFERENCE_CLASSES
        .iter()
        .fold(LevelConfig::new(128, 128), |cfg, &class| cfg.with_class(class))
}

/// `count` rectangular footprints of side `1..=max_side`, fully inside a
/// `width` by `height` map.
pub fn random_footprints(
    seed: u64,
    count: usize,
    width: u16,
    height: u16,
    max_side: u16,
) -> Vec<Vec<TileCoord>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let max_side = max_side.clamp(1, width.min(height));
    (0..count)
        .map(|_| {
            let w = rng.random_range(1..=max_side);
            let h = rng.random_range(1..=max_side);
            let x = rng.random_range(0..=width - w);
            let y = rng.random_range(0..=height - h);
            (y..y + h)
                .flat_map(|ty| (x..x + w).map(move |tx| TileCoord::new(tx, ty)))
                .collect()
        })
        .collect()
}

/// A permutation of `0..len` used to pick which live object to despawn next.
pub fn churn_schedule(seed: u64, len: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    order
}
