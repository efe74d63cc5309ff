//! The [`Level`] aggregate: object table, class chains, index and map.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tessera_codec::{decode_table, encode_table, CodecError, RawRecord};
use tessera_core::{ClassId, FreeSlot, ObjectId, SlotIndex, TileCoord};
use tessera_slots::{free_chain_mask, FreeListAllocator, ObjectChain};
use tessera_xref::{check_consistency, ConsistencyError, CrossReferenceIndex};

use crate::config::LevelConfig;
use crate::error::LevelError;
use crate::image::LevelImage;
use crate::object::{ObjectRecord, ObjectSlot};
use crate::tilemap::TileMap;

/// Wire position of the free link in object records.
const FIELD_OBJECT_LINK: usize = 1;

/// One game level's live objects and where they stand.
///
/// Object ids are indices into the master object table. Each live object
/// owns one link in its class chain and at most one placement in the
/// cross-reference index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    config: LevelConfig,
    objects: FreeListAllocator<ObjectSlot>,
    chains: IndexMap<ClassId, ObjectChain>,
    xref: CrossReferenceIndex,
    tiles: TileMap,
}

impl Level {
    /// Build an empty level. Fails if `config` does not validate.
    pub fn new(config: LevelConfig) -> Result<Self, LevelError> {
        config.validate()?;
        let mut chains = IndexMap::with_capacity(config.classes.len());
        for spec in &config.classes {
            chains.insert(spec.class, ObjectChain::new(spec.capacity)?);
        }
        Ok(Self {
            objects: FreeListAllocator::new(config.object_capacity)?,
            xref: CrossReferenceIndex::new(config.xref_capacity)?,
            tiles: TileMap::new(config.width, config.height),
            chains,
            config,
        })
    }

    /// The configuration this level was built from.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.reset();
        for chain in self.chains.values_mut() {
            chain.clear();
        }
        self.xref.clear();
        self.tiles.clear();
    }

    // ── Editing ──────────────────────────────────────────────────

    /// Create an object of `class` covering `tiles`.
    ///
    /// Takes an object record, a link at the tail of the class chain and
    /// one cross-reference entry per tile. If any of them cannot be had,
    /// everything taken so far is given back and the level is unchanged.
    pub fn spawn(&mut self, class: ClassId, tiles: &[TileCoord]) -> Result<ObjectId, LevelError> {
        let chain = self
            .chains
            .get_mut(&class)
            .ok_or(LevelError::UnknownClass { class })?;

        let slot = self.objects.acquire(ObjectSlot::Live(ObjectRecord {
            class,
            link: SlotIndex::NONE,
            anchor: SlotIndex::NONE,
        }))?;
        let object = ObjectId(slot.0);

        let link = match chain.acquire_link_with(object.0) {
            Ok(link) => link,
            Err(e) => {
                self.objects.release(slot);
                return Err(e.into());
            }
        };

        let anchor = match self.xref.place_object(object, &mut self.tiles, tiles) {
            Ok(anchor) => anchor,
            Err(e) => {
                chain.release_link(link);
                self.objects.release(slot);
                log::debug!("spawn of class {class} rolled back: {e}");
                return Err(e.into());
            }
        };

        if let Some(ObjectSlot::Live(record)) = self.objects.get_mut(slot) {
            record.link = link;
            record.anchor = anchor;
        }
        log::trace!("spawned object {object} of class {class} on {} tiles", tiles.len());
        Ok(object)
    }

    /// Remove a live object from the map, its class chain and the object
    /// table. Returns its last record.
    pub fn despawn(&mut self, object: ObjectId) -> Result<ObjectRecord, LevelError> {
        let record = self.record(object)?;
        self.xref.remove_object(record.anchor, &mut self.tiles);
        if let Some(chain) = self.chains.get_mut(&record.class) {
            chain.release_link(record.link);
        }
        self.objects.release(SlotIndex(object.0));
        log::trace!("despawned object {object}");
        Ok(record)
    }

    /// Move a live object onto `tiles`.
    ///
    /// Needs `tiles.len()` free cross-reference entries on top of those
    /// the object already holds. On failure the object stays where it was.
    pub fn relocate(&mut self, object: ObjectId, tiles: &[TileCoord]) -> Result<(), LevelError> {
        let record = self.record(object)?;
        let anchor = self
            .xref
            .relocate_object(record.anchor, object, &mut self.tiles, tiles)?;
        if let Some(ObjectSlot::Live(r)) = self.objects.get_mut(SlotIndex(object.0)) {
            r.anchor = anchor;
        }
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Objects standing on `tile`, most recently placed first.
    pub fn objects_at(&self, tile: TileCoord) -> impl Iterator<Item = ObjectId> + '_ {
        self.xref.owners_at(&self.tiles, tile)
    }

    /// Tiles covered by a live object, in ring order from its anchor.
    pub fn footprint(&self, object: ObjectId) -> Result<SmallVec<[TileCoord; 8]>, LevelError> {
        let record = self.record(object)?;
        Ok(self.xref.footprint(record.anchor).collect())
    }

    /// Live objects of `class` in spawn order.
    pub fn live_objects(
        &self,
        class: ClassId,
    ) -> Result<impl Iterator<Item = ObjectId> + '_, LevelError> {
        let chain = self
            .chains
            .get(&class)
            .ok_or(LevelError::UnknownClass { class })?;
        Ok(chain
            .iter()
            .filter_map(move |link| chain.payload(link).map(ObjectId)))
    }

    /// The record of a live object.
    pub fn object(&self, object: ObjectId) -> Option<&ObjectRecord> {
        self.objects
            .get(SlotIndex(object.0))
            .and_then(ObjectSlot::record)
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.objects.live_len()
    }

    /// The cross-reference index.
    pub fn xref(&self) -> &CrossReferenceIndex {
        &self.xref
    }

    /// The tile map.
    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    /// The chain of `class`.
    pub fn chain(&self, class: ClassId) -> Option<&ObjectChain> {
        self.chains.get(&class)
    }

    fn record(&self, object: ObjectId) -> Result<ObjectRecord, LevelError> {
        self.object(object)
            .copied()
            .ok_or(LevelError::UnknownObject { object })
    }

    // ── Verification ─────────────────────────────────────────────

    /// Check that all four tables agree with each other.
    ///
    /// Runs the cross-reference consistency check, confirms that every
    /// non-empty tile heads a bucket of its own tile, and that each live
    /// object, its chain link and its placement point at one another.
    pub fn verify(&self) -> Result<(), LevelError> {
        check_consistency(&self.xref, &self.tiles)?;
        for (tile, head) in self.tiles.occupied_tiles() {
            match self.xref.placement(head) {
                Some(p) if p.tile == tile => {}
                Some(p) => {
                    return Err(ConsistencyError::BucketMismatch {
                        entry: head,
                        bucket: tile,
                        tile: p.tile,
                    }
                    .into())
                }
                None => {
                    return Err(ConsistencyError::BrokenBucket {
                        bucket: tile,
                        link: head,
                    }
                    .into())
                }
            }
        }

        let mut rings: IndexMap<ClassId, IndexSet<SlotIndex>> = IndexMap::new();
        for (&class, chain) in &self.chains {
            let ring: IndexSet<SlotIndex> = chain.iter().collect();
            let last = ring.last().copied().unwrap_or(SlotIndex::NONE);
            if ring.len() != chain.len() || last != chain.tail() {
                log::warn!("chain of class {class} does not match its ring walk");
                return Err(LevelError::ObjectMismatch {
                    object: ObjectId::NONE,
                });
            }
            rings.insert(class, ring);
        }

        let mut anchored = 0;
        for (slot, entry) in self.objects.iter() {
            let object = ObjectId(slot.0);
            let record = entry.record().ok_or(LevelError::ObjectMismatch { object })?;
            let chain = self
                .chains
                .get(&record.class)
                .ok_or(LevelError::UnknownClass {
                    class: record.class,
                })?;
            let in_ring = rings
                .get(&record.class)
                .is_some_and(|ring| ring.contains(&record.link));
            if !in_ring || chain.payload(record.link) != Some(object.0) {
                return Err(LevelError::ObjectMismatch { object });
            }
            let mut ring = self.xref.ring(record.anchor);
            let owned = ring.all(|i| {
                self.xref
                    .placement(i)
                    .is_some_and(|p| p.owner == object)
            });
            if !owned || (record.anchor.is_some() && self.xref.placement(record.anchor).is_none()) {
                return Err(LevelError::ObjectMismatch { object });
            }
            anchored += self.xref.ring(record.anchor).count();
        }
        if anchored != self.xref.placed_len() {
            log::warn!(
                "{} cross-reference entries belong to no live object",
                self.xref.placed_len().saturating_sub(anchored)
            );
            return Err(LevelError::ObjectMismatch {
                object: ObjectId::NONE,
            });
        }

        let linked: usize = rings.values().map(IndexSet::len).sum();
        if linked != self.objects.live_len() {
            return Err(LevelError::ObjectMismatch {
                object: ObjectId::NONE,
            });
        }
        Ok(())
    }

    // ── Persistence ──────────────────────────────────────────────

    /// Encode every table into a [`LevelImage`].
    pub fn encode(&self) -> LevelImage {
        let free_head = self.objects.free_head();
        let objects = encode_table(self.objects.slots().map(|(i, slot)| {
            if i.is_none() {
                ObjectSlot::vacant(free_head).to_raw()
            } else {
                slot.to_raw()
            }
        }));
        let chains = self
            .chains
            .iter()
            .map(|(&class, chain)| (class, chain.encode()))
            .collect();
        LevelImage {
            objects,
            chains,
            xref: self.xref.encode(),
            tiles: self.tiles.encode(),
        }
    }

    /// Restore a level from `image`, checking every table against `config`
    /// and the tables against each other.
    pub fn decode(config: LevelConfig, image: &LevelImage) -> Result<Self, LevelError> {
        config.validate()?;

        let objects = decode_objects(&image.objects)?;
        expect_capacity(config.object_capacity, objects.capacity())?;

        if let Some(&class) = image.chains.keys().find(|c| {
            !config.classes.iter().any(|spec| spec.class == **c)
        }) {
            return Err(LevelError::UnknownClass { class });
        }
        let mut chains = IndexMap::with_capacity(config.classes.len());
        for spec in &config.classes {
            let bytes = image
                .chains
                .get(&spec.class)
                .ok_or(LevelError::MissingChain { class: spec.class })?;
            let chain = ObjectChain::decode_from(bytes)?;
            expect_capacity(spec.capacity, chain.capacity())?;
            chains.insert(spec.class, chain);
        }

        let xref = CrossReferenceIndex::decode_from(&image.xref)?;
        expect_capacity(config.xref_capacity, xref.capacity())?;
        let tiles = TileMap::decode_from(config.width, config.height, &image.tiles)?;

        let level = Self {
            config,
            objects,
            chains,
            xref,
            tiles,
        };
        level.verify()?;
        Ok(level)
    }
}

fn expect_capacity(expected: usize, found: usize) -> Result<(), CodecError> {
    if expected == found {
        Ok(())
    } else {
        Err(CodecError::CapacityMismatch { expected, found })
    }
}

fn decode_objects(bytes: &[u8]) -> Result<FreeListAllocator<ObjectSlot>, CodecError> {
    let records = decode_table::<3>(bytes)?;
    let capacity = records.len();
    let free_head = SlotIndex(records[0].field(FIELD_OBJECT_LINK));
    let free = free_chain_mask(capacity, free_head, |i| records[i].field(FIELD_OBJECT_LINK))?;

    let slots = records
        .iter()
        .enumerate()
        .map(|(i, raw): (usize, &RawRecord<3>)| {
            if i == 0 {
                ObjectSlot::vacant(SlotIndex::NONE)
            } else if free[i] {
                if raw.field(0) != ObjectSlot::FREE_CLASS || raw.field(2) != 0 {
                    log::warn!("free object record {i} carries stale fields; dropping them");
                }
                ObjectSlot::vacant(SlotIndex(raw.field(FIELD_OBJECT_LINK)))
            } else {
                ObjectSlot::live_from_raw(raw)
            }
        })
        .collect();
    FreeListAllocator::from_slots(slots, free_head)
}
