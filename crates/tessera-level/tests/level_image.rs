//! Integration test: level images under random editing.
//!
//! Spawns, despawns and relocates objects at random on a small level,
//! and checks that every accepted edit keeps the tables in agreement,
//! every rejected edit leaves the encoded image byte-identical, and every
//! image decodes back to an equal level.

use proptest::prelude::*;
use tessera_codec::CodecError;
use tessera_core::{ClassId, ObjectId, TileCoord};
use tessera_level::{Level, LevelConfig, LevelError};
use tessera_test_utils::square_footprint;

const CLASSES: [ClassId; 3] = [ClassId(10), ClassId(11), ClassId(12)];

fn config() -> LevelConfig {
    let mut cfg = LevelConfig::new(12, 12)
        .with_class_capacity(CLASSES[0], 6)
        .with_class_capacity(CLASSES[1], 6)
        .with_class_capacity(CLASSES[2], 3);
    cfg.xref_capacity = 48;
    cfg.object_capacity = 12;
    cfg
}

#[test]
fn default_sized_level_round_trips() {
    let cfg = LevelConfig::default().with_class(ClassId(1));
    let mut level = Level::new(cfg.clone()).unwrap();
    let id = level.spawn(ClassId(1), &square_footprint(10, 10, 3, 3)).unwrap();
    assert_eq!(level.objects_at(TileCoord::new(11, 11)).collect::<Vec<_>>(), vec![id]);

    let image = level.encode();
    assert_eq!(image.xref.len(), 16_000);
    assert_eq!(image.objects.len(), 872 * 6);
    let decoded = Level::decode(cfg, &image).unwrap();
    assert_eq!(decoded.encode().hash(), image.hash());
}

#[test]
fn despawned_ids_are_reused_last_in_first_out() {
    let mut level = Level::new(config()).unwrap();
    let a = level.spawn(CLASSES[0], &[TileCoord::new(0, 0)]).unwrap();
    let b = level.spawn(CLASSES[0], &[TileCoord::new(1, 0)]).unwrap();
    level.despawn(a).unwrap();
    level.despawn(b).unwrap();
    assert_eq!(level.spawn(CLASSES[1], &[]).unwrap(), b);
    assert_eq!(level.spawn(CLASSES[1], &[]).unwrap(), a);
}

#[test]
fn corrupted_object_record_is_rejected() {
    let mut level = Level::new(config()).unwrap();
    level.spawn(CLASSES[0], &[TileCoord::new(2, 2)]).unwrap();
    let mut image = level.encode();
    // Object 1's link field now points at an unused chain slot.
    image.objects[6 + 2] = 4;
    assert!(matches!(
        Level::decode(config(), &image),
        Err(LevelError::ObjectMismatch { object: ObjectId(1) })
    ));
}

#[test]
fn stale_chain_tail_is_rejected() {
    let mut level = Level::new(config()).unwrap();
    level.spawn(CLASSES[0], &[]).unwrap();
    level.spawn(CLASSES[0], &[]).unwrap();
    let mut image = level.encode();
    let chain = image.chains.get_mut(&CLASSES[0]).unwrap();
    assert_eq!(chain[0], 2);
    // The cached tail now names the first link instead of the last.
    chain[0] = 1;
    assert!(matches!(
        Level::decode(config(), &image),
        Err(LevelError::Codec(CodecError::BrokenRing { slot: 0 }))
    ));
}

#[test]
fn stranded_chain_link_is_rejected() {
    let mut level = Level::new(config()).unwrap();
    level.spawn(CLASSES[1], &[]).unwrap();
    level.spawn(CLASSES[1], &[]).unwrap();
    let mut image = level.encode();
    let chain = image.chains.get_mut(&CLASSES[1]).unwrap();
    // Link 1 ends the ring and becomes the tail; link 2 is cut off.
    chain[6 + 2] = 0;
    chain[0] = 1;
    assert!(matches!(
        Level::decode(config(), &image),
        Err(LevelError::Codec(CodecError::BrokenRing { slot: 2 }))
    ));
}

#[derive(Clone, Debug)]
enum Edit {
    Spawn { class: usize, x: u16, y: u16, w: u16, h: u16 },
    Despawn { pick: usize },
    Relocate { pick: usize, x: u16, y: u16 },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (0usize..3, 0u16..14, 0u16..12, 0u16..4, 1u16..4)
            .prop_map(|(class, x, y, w, h)| Edit::Spawn { class, x, y, w, h }),
        2 => any::<usize>().prop_map(|pick| Edit::Despawn { pick }),
        1 => (any::<usize>(), 0u16..12, 0u16..12)
            .prop_map(|(pick, x, y)| Edit::Relocate { pick, x, y }),
    ]
}

fn live_ids(level: &Level) -> Vec<ObjectId> {
    CLASSES
        .iter()
        .flat_map(|&class| level.live_objects(class).unwrap().collect::<Vec<_>>())
        .collect()
}

#[cfg(not(miri))]
mod proptests {
    use super::*;

    proptest! {
        #[test]
        fn edits_keep_level_consistent(edits in prop::collection::vec(edit_strategy(), 1..40)) {
            let mut level = Level::new(config()).unwrap();

            for edit in edits {
                let before = level.encode();
                let result = match edit {
                    Edit::Spawn { class, x, y, w, h } => level
                        .spawn(CLASSES[class], &square_footprint(x, y, w, h))
                        .map(|_| ()),
                    Edit::Despawn { pick } => {
                        let ids = live_ids(&level);
                        if ids.is_empty() {
                            continue;
                        }
                        level.despawn(ids[pick % ids.len()]).map(|_| ())
                    }
                    Edit::Relocate { pick, x, y } => {
                        let ids = live_ids(&level);
                        if ids.is_empty() {
                            continue;
                        }
                        level.relocate(ids[pick % ids.len()], &[TileCoord::new(x, y)])
                    }
                };

                match result {
                    Ok(()) => {}
                    Err(LevelError::Slots(_)) => prop_assert_eq!(&level.encode(), &before),
                    Err(other) => prop_assert!(false, "unexpected error {other}"),
                }
                prop_assert!(level.verify().is_ok());
                prop_assert_eq!(live_ids(&level).len(), level.object_count());

                let image = level.encode();
                let decoded = Level::decode(config(), &image).unwrap();
                prop_assert_eq!(&decoded, &level);
            }
        }
    }
}
