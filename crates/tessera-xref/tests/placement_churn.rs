//! Integration test: placement churn against a reference model.
//!
//! Drives a cross-reference index through random sequences of place,
//! remove and relocate calls, mirrors every call in a plain map of
//! footprints, and checks after each step that bucket contents, ring
//! contents and pool accounting agree with the model.

use std::collections::HashMap;

use proptest::prelude::*;
use tessera_core::{ObjectId, SlotError, SlotIndex, TileCoord, TileGrid};
use tessera_test_utils::{line_footprint, square_footprint, MockTileGrid};
use tessera_xref::{check_consistency, CrossReferenceIndex};

// ── Model ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Op {
    Place { owner: u16, tiles: Vec<(u16, u16)> },
    Remove { pick: usize },
    Relocate { pick: usize, tiles: Vec<(u16, u16)> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let tiles = prop::collection::vec((0u16..6, 0u16..6), 0..6);
    prop_oneof![
        3 => (1u16..20, tiles.clone()).prop_map(|(owner, tiles)| Op::Place { owner, tiles }),
        2 => any::<usize>().prop_map(|pick| Op::Remove { pick }),
        1 => (any::<usize>(), tiles).prop_map(|(pick, tiles)| Op::Relocate { pick, tiles }),
    ]
}

fn coords(tiles: &[(u16, u16)]) -> Vec<TileCoord> {
    tiles.iter().copied().map(TileCoord::from).collect()
}

type Live = HashMap<SlotIndex, (ObjectId, Vec<TileCoord>)>;

/// Sorted owners expected at every tile.
fn expected_buckets(live: &Live) -> HashMap<TileCoord, Vec<ObjectId>> {
    let mut buckets: HashMap<TileCoord, Vec<ObjectId>> = HashMap::new();
    for (owner, tiles) in live.values() {
        for &tile in tiles {
            buckets.entry(tile).or_default().push(*owner);
        }
    }
    for owners in buckets.values_mut() {
        owners.sort();
    }
    buckets
}

fn assert_matches_model(
    index: &CrossReferenceIndex,
    grid: &MockTileGrid,
    live: &Live,
) {
    check_consistency(index, grid).unwrap();

    let placed: usize = live.values().map(|(_, tiles)| tiles.len()).sum();
    assert_eq!(index.placed_len(), placed);
    assert_eq!(index.free_len() + placed, index.capacity() - 1);

    let expected = expected_buckets(live);
    assert_eq!(grid.occupied(), expected.len());
    for (tile, owners) in &expected {
        let mut found: Vec<ObjectId> = index.owners_at(grid, *tile).collect();
        found.sort();
        assert_eq!(&found, owners, "bucket at {tile}");
    }

    for (&handle, (owner, tiles)) in live {
        let mut footprint: Vec<TileCoord> = index.footprint(handle).collect();
        footprint.sort();
        let mut want = tiles.clone();
        want.sort();
        assert_eq!(footprint, want);
        assert!(index.ring(handle).all(|i| index.placement(i).unwrap().owner == *owner));
    }
}

// ── Scenario tests ───────────────────────────────────────────────────

#[test]
fn stacked_objects_on_one_tile() {
    let mut index = CrossReferenceIndex::new(64).unwrap();
    let mut grid = MockTileGrid::bounded(16, 16);
    let tile = TileCoord::new(5, 5);

    let handles: Vec<SlotIndex> = (1..=5)
        .map(|owner| index.place_object(ObjectId(owner), &mut grid, &[tile]).unwrap())
        .collect();
    assert_eq!(
        index.owners_at(&grid, tile).collect::<Vec<_>>(),
        (1..=5).rev().map(ObjectId).collect::<Vec<_>>()
    );

    index.remove_object(handles[2], &mut grid);
    index.remove_object(handles[4], &mut grid);
    index.remove_object(handles[0], &mut grid);
    assert_eq!(
        index.owners_at(&grid, tile).collect::<Vec<_>>(),
        vec![ObjectId(4), ObjectId(2)]
    );
    check_consistency(&index, &grid).unwrap();
}

#[test]
fn large_footprints_share_edges() {
    let mut index = CrossReferenceIndex::new(128).unwrap();
    let mut grid = MockTileGrid::new();
    let left = index
        .place_object(ObjectId(1), &mut grid, &square_footprint(0, 0, 4, 4))
        .unwrap();
    let right = index
        .place_object(ObjectId(2), &mut grid, &square_footprint(3, 0, 4, 4))
        .unwrap();
    let wall = index
        .place_object(ObjectId(3), &mut grid, &line_footprint(0, 3, 7))
        .unwrap();

    assert_eq!(index.owners_at(&grid, TileCoord::new(3, 3)).count(), 3);
    assert_eq!(index.ring(left).count(), 16);

    index.remove_object(right, &mut grid);
    assert_eq!(
        index.owners_at(&grid, TileCoord::new(3, 3)).collect::<Vec<_>>(),
        vec![ObjectId(3), ObjectId(1)]
    );
    index.remove_object(wall, &mut grid);
    index.remove_object(left, &mut grid);
    assert!(grid.is_empty());
    assert_eq!(index.free_len(), 127);
}

#[test]
fn exhausted_pool_leaves_state_intact() {
    let mut index = CrossReferenceIndex::new(10).unwrap();
    let mut grid = MockTileGrid::new();
    index
        .place_object(ObjectId(1), &mut grid, &line_footprint(0, 0, 6))
        .unwrap();
    let before_index = index.clone();
    let before_grid = grid.clone();

    let err = index
        .place_object(ObjectId(2), &mut grid, &line_footprint(0, 1, 4))
        .unwrap_err();
    assert_eq!(
        err,
        SlotError::Exhausted {
            requested: 4,
            available: 3
        }
    );
    assert_eq!(index, before_index);
    assert_eq!(grid, before_grid);

    index
        .place_object(ObjectId(2), &mut grid, &line_footprint(0, 1, 3))
        .unwrap();
    assert_eq!(index.free_len(), 0);
    check_consistency(&index, &grid).unwrap();
}

#[test]
fn saved_index_resumes_allocation_order() {
    let mut index = CrossReferenceIndex::new(20).unwrap();
    let mut grid = MockTileGrid::new();
    let a = index
        .place_object(ObjectId(1), &mut grid, &line_footprint(0, 0, 3))
        .unwrap();
    index
        .place_object(ObjectId(2), &mut grid, &line_footprint(0, 1, 3))
        .unwrap();
    index.remove_object(a, &mut grid);

    let mut restored = CrossReferenceIndex::decode_from(&index.encode()).unwrap();
    let mut restored_grid = grid.clone();
    check_consistency(&restored, &restored_grid).unwrap();

    let next = index.place_object(ObjectId(9), &mut grid, &[TileCoord::new(8, 8)]).unwrap();
    let restored_next = restored
        .place_object(ObjectId(9), &mut restored_grid, &[TileCoord::new(8, 8)])
        .unwrap();
    assert_eq!(next, restored_next);
    assert_eq!(index.encode(), restored.encode());
    assert_eq!(restored_grid.bucket_head(TileCoord::new(8, 8)), restored_next);
}

// ── Property tests ───────────────────────────────────────────────────

#[cfg(not(miri))]
mod proptests {
    use super::*;

    proptest! {
        #[test]
        fn random_churn_matches_model(ops in prop::collection::vec(op_strategy(), 1..60)) {
            let mut index = CrossReferenceIndex::new(40).unwrap();
            let mut grid = MockTileGrid::new();
            let mut live = Live::new();

            for op in ops {
                match op {
                    Op::Place { owner, tiles } => {
                        let tiles = coords(&tiles);
                        let before = index.clone();
                        match index.place_object(ObjectId(owner), &mut grid, &tiles) {
                            Ok(handle) if handle.is_none() => prop_assert!(tiles.is_empty()),
                            Ok(handle) => {
                                prop_assert!(live.insert(handle, (ObjectId(owner), tiles)).is_none());
                            }
                            Err(SlotError::Exhausted { requested, available }) => {
                                prop_assert_eq!(requested, tiles.len());
                                prop_assert_eq!(available, before.free_len());
                                prop_assert_eq!(&index, &before);
                            }
                            Err(other) => prop_assert!(false, "unexpected error {other}"),
                        }
                    }
                    Op::Remove { pick } => {
                        if live.is_empty() {
                            continue;
                        }
                        let mut handles: Vec<SlotIndex> = live.keys().copied().collect();
                        handles.sort();
                        let handle = handles[pick % handles.len()];
                        let (_, tiles) = live.remove(&handle).unwrap();
                        prop_assert_eq!(index.remove_object(handle, &mut grid), tiles.len());
                    }
                    Op::Relocate { pick, tiles } => {
                        if live.is_empty() {
                            continue;
                        }
                        let mut handles: Vec<SlotIndex> = live.keys().copied().collect();
                        handles.sort();
                        let handle = handles[pick % handles.len()];
                        let owner = live[&handle].0;
                        let tiles = coords(&tiles);
                        if let Ok(moved) = index.relocate_object(handle, owner, &mut grid, &tiles) {
                            live.remove(&handle);
                            if moved.is_some() {
                                live.insert(moved, (owner, tiles));
                            }
                        }
                    }
                }
                assert_matches_model(&index, &grid, &live);
            }

            for (handle, _) in live.drain() {
                index.remove_object(handle, &mut grid);
            }
            prop_assert!(grid.is_empty());
            prop_assert_eq!(index.free_len(), index.capacity() - 1);
        }
    }
}
