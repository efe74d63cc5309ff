//! The cross-reference table and its placement/removal operations.

use std::io::{Read, Write};
use std::num::NonZeroU16;

use smallvec::SmallVec;
use tessera_codec::{decode_table, encode_table, read_table, write_table, CodecError, RawRecord};
use tessera_core::{FreeSlot, ObjectId, SlotError, SlotIndex, TileCoord, TileGrid};
use tessera_slots::{free_chain_mask, FreeListAllocator};

use crate::entry::{Placement, XrefEntry, FIELD_BUCKET_NEXT, FIELD_RING_NEXT};
use crate::iter::{BucketIter, RingIter};

/// Spatial multi-map between objects and the tiles they occupy.
///
/// Owns one fixed table of [`XrefEntry`] slots. Bucket heads live in the
/// caller's [`TileGrid`]; every mutating call takes the grid explicitly so
/// the pair is always updated together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossReferenceIndex {
    entries: FreeListAllocator<XrefEntry>,
}

impl CrossReferenceIndex {
    /// Entry count of a standard level save.
    pub const DEFAULT_CAPACITY: usize = 1600;

    /// Create an all-free index of `capacity` entries (sentinel included).
    pub fn new(capacity: usize) -> Result<Self, SlotError> {
        Ok(Self {
            entries: FreeListAllocator::new(capacity)?,
        })
    }

    /// Return every entry to the free stack, matching a fresh index.
    ///
    /// The caller's grid still holds the old bucket heads and must be
    /// cleared alongside.
    pub fn clear(&mut self) {
        self.entries.reset();
    }

    /// Place `owner` on every tile in `locations`, in order.
    ///
    /// Each location gets its own entry, prepended to that tile's bucket
    /// chain. All entries of the call are joined into one ring. Returns
    /// the entry created for the **last** location; keep it to remove the
    /// placement later.
    ///
    /// All-or-nothing: if the pool runs dry part-way, every entry taken by
    /// this call is released in reverse order and the grid is never
    /// touched, leaving the free stack and all bucket heads exactly as
    /// they were. An empty `locations` places nothing and returns
    /// [`SlotIndex::NONE`].
    pub fn place_object<G: TileGrid + ?Sized>(
        &mut self,
        owner: ObjectId,
        grid: &mut G,
        locations: &[TileCoord],
    ) -> Result<SlotIndex, SlotError> {
        if let Some(&tile) = locations.iter().find(|&&tile| !grid.contains(tile)) {
            return Err(SlotError::TileOutOfBounds { tile });
        }

        let mut acquired: SmallVec<[SlotIndex; 8]> = SmallVec::with_capacity(locations.len());
        for &tile in locations {
            let entry = XrefEntry::Placed(Placement {
                owner,
                tile,
                bucket_next: SlotIndex::NONE,
                ring_next: SlotIndex::NONE,
            });
            match self.entries.acquire(entry) {
                Ok(index) => acquired.push(index),
                Err(_) => {
                    let available = acquired.len();
                    for &index in acquired.iter().rev() {
                        self.entries.release(index);
                    }
                    log::debug!(
                        "placement of object {owner} rolled back: {} tiles requested, {available} free",
                        locations.len()
                    );
                    return Err(SlotError::Exhausted {
                        requested: locations.len(),
                        available,
                    });
                }
            }
        }

        let Some(&first) = acquired.first() else {
            return Ok(SlotIndex::NONE);
        };
        for (k, (&index, &tile)) in acquired.iter().zip(locations).enumerate() {
            let ring_next = acquired.get(k + 1).copied().unwrap_or(first);
            let bucket_next = grid.bucket_head(tile);
            if let Some(XrefEntry::Placed(p)) = self.entries.get_mut(index) {
                p.bucket_next = bucket_next;
                p.ring_next = ring_next;
            }
            grid.set_bucket_head(tile, index);
        }

        let handle = acquired[acquired.len() - 1];
        log::trace!(
            "placed object {owner} on {} tiles, handle {handle}",
            acquired.len()
        );
        Ok(handle)
    }

    /// Remove the placement anchored at `handle` from every tile it covers.
    ///
    /// Walks the ring from `handle` back to `handle`, unlinking each entry
    /// from its bucket chain and releasing it. Returns the number of
    /// entries released.
    ///
    /// `handle` must come from a [`place_object`](Self::place_object) call
    /// that has not been removed yet. A stale handle stops the walk at the
    /// first free entry and trips a debug assertion.
    pub fn remove_object<G: TileGrid + ?Sized>(&mut self, handle: SlotIndex, grid: &mut G) -> usize {
        if handle.is_none() {
            return 0;
        }
        let limit = self.entries.capacity();
        let mut removed = 0;
        let mut cursor = handle;
        loop {
            let Some(&placement) = self.entries.get(cursor).and_then(XrefEntry::placement) else {
                log::warn!("membership ring of {handle} is broken at entry {cursor}");
                debug_assert!(false, "membership ring of {handle} is broken at entry {cursor}");
                break;
            };
            self.unlink_from_bucket(cursor, &placement, grid);
            self.entries.release(cursor);
            removed += 1;
            if placement.ring_next == handle || removed >= limit {
                break;
            }
            cursor = placement.ring_next;
        }
        log::trace!("removed {removed} entries anchored at {handle}");
        removed
    }

    /// Move a placement to new tiles without ever losing it.
    ///
    /// The new footprint is placed first and the old one removed only on
    /// success, so the pool must hold `locations.len()` free entries even
    /// when the footprints overlap. On failure the old placement and
    /// `handle` remain valid.
    pub fn relocate_object<G: TileGrid + ?Sized>(
        &mut self,
        handle: SlotIndex,
        owner: ObjectId,
        grid: &mut G,
        locations: &[TileCoord],
    ) -> Result<SlotIndex, SlotError> {
        let new_handle = self.place_object(owner, grid, locations)?;
        self.remove_object(handle, grid);
        Ok(new_handle)
    }

    /// Entry indices chained at `tile`, most recent first.
    pub fn bucket<G: TileGrid + ?Sized>(&self, grid: &G, tile: TileCoord) -> BucketIter<'_> {
        BucketIter::new(&self.entries, grid.bucket_head(tile))
    }

    /// Owners of the entries chained at `tile`, most recent first.
    pub fn owners_at<G: TileGrid + ?Sized>(
        &self,
        grid: &G,
        tile: TileCoord,
    ) -> impl Iterator<Item = ObjectId> + '_ {
        self.owners_from(grid.bucket_head(tile))
    }

    fn owners_from(&self, head: SlotIndex) -> impl Iterator<Item = ObjectId> + '_ {
        BucketIter::new(&self.entries, head)
            .filter_map(move |i| self.placement(i).map(|p| p.owner))
    }

    /// Entries of the placement anchored at `handle`, starting with `handle`.
    pub fn ring(&self, handle: SlotIndex) -> RingIter<'_> {
        RingIter::new(&self.entries, handle)
    }

    /// Tiles covered by the placement anchored at `handle`.
    pub fn footprint(&self, handle: SlotIndex) -> impl Iterator<Item = TileCoord> + '_ {
        self.ring(handle)
            .filter_map(move |i| self.placement(i).map(|p| p.tile))
    }

    /// Any entry, sentinel included.
    pub fn entry(&self, index: SlotIndex) -> Option<&XrefEntry> {
        self.entries.slot(index)
    }

    /// A placed entry.
    pub fn placement(&self, index: SlotIndex) -> Option<&Placement> {
        self.entries.get(index).and_then(XrefEntry::placement)
    }

    /// Placed entries in index order.
    pub fn placements(&self) -> impl Iterator<Item = (SlotIndex, &Placement)> + '_ {
        self.entries
            .iter()
            .filter_map(|(i, e)| e.placement().map(|p| (i, p)))
    }

    /// Total entries, sentinel included.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Entries on the free stack.
    pub fn free_len(&self) -> usize {
        self.entries.free_len()
    }

    /// Entries currently placed.
    pub fn placed_len(&self) -> usize {
        self.entries.live_len()
    }

    /// Top of the free stack.
    pub fn free_head(&self) -> SlotIndex {
        self.entries.free_head()
    }

    /// Encode to exactly `capacity * 10` bytes.
    pub fn encode(&self) -> Vec<u8> {
        encode_table(self.raw_records())
    }

    /// Stream the encoded table to a writer.
    pub fn write_to(&self, w: &mut dyn Write) -> Result<(), CodecError> {
        write_table(w, self.raw_records())
    }

    /// Restore an index from an encoded table. Capacity is `bytes.len() / 10`.
    pub fn decode_from(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_records(decode_table::<5>(bytes)?)
    }

    /// Read a table of `capacity` entries from a stream.
    pub fn read_from(r: &mut dyn Read, capacity: usize) -> Result<Self, CodecError> {
        Self::from_records(read_table::<5>(r, capacity)?)
    }

    fn from_records(records: Vec<RawRecord<5>>) -> Result<Self, CodecError> {
        let capacity = records.len();
        let free_head = SlotIndex(records[0].field(FIELD_BUCKET_NEXT));
        let free = free_chain_mask(capacity, free_head, |i| records[i].field(FIELD_BUCKET_NEXT))?;

        let mut slots = Vec::with_capacity(capacity);
        for (i, raw) in records.iter().enumerate() {
            if i == 0 {
                slots.push(XrefEntry::vacant(SlotIndex::NONE));
            } else if free[i] {
                if !XrefEntry::is_canonical_free(raw) {
                    log::warn!("free entry {i} carries stale fields; dropping them");
                }
                slots.push(XrefEntry::free_from_raw(raw));
            } else {
                for link in [raw.field(FIELD_BUCKET_NEXT), raw.field(FIELD_RING_NEXT)] {
                    if link as usize >= capacity {
                        return Err(CodecError::LinkOutOfRange {
                            slot: i,
                            link,
                            capacity,
                        });
                    }
                }
                slots.push(XrefEntry::placed_from_raw(raw));
            }
        }

        Ok(Self {
            entries: FreeListAllocator::from_slots(slots, free_head)?,
        })
    }

    fn raw_records(&self) -> impl Iterator<Item = RawRecord<5>> + '_ {
        let free_head = self.entries.free_head();
        self.entries.slots().map(move |(i, entry)| {
            if i.is_none() {
                XrefEntry::vacant(free_head).to_raw()
            } else {
                entry.to_raw()
            }
        })
    }

    /// Splice `index` out of the bucket chain of `placement.tile`.
    fn unlink_from_bucket<G: TileGrid + ?Sized>(
        &mut self,
        index: SlotIndex,
        placement: &Placement,
        grid: &mut G,
    ) {
        let head = grid.bucket_head(placement.tile);
        if head == index {
            grid.set_bucket_head(placement.tile, placement.bucket_next);
            return;
        }
        let mut cursor = head;
        for _ in 0..self.entries.capacity() {
            let Some(XrefEntry::Placed(p)) = self.entries.get_mut(cursor) else {
                break;
            };
            if p.bucket_next == index {
                p.bucket_next = placement.bucket_next;
                return;
            }
            cursor = p.bucket_next;
        }
        log::warn!(
            "entry {index} not found in bucket chain at {}",
            placement.tile
        );
    }
}

const DEFAULT_SLOTS: NonZeroU16 =
    NonZeroU16::MIN.saturating_add(CrossReferenceIndex::DEFAULT_CAPACITY as u16 - 1);

impl Default for CrossReferenceIndex {
    fn default() -> Self {
        Self {
            entries: FreeListAllocator::with_capacity(DEFAULT_SLOTS),
        }
    }
}
