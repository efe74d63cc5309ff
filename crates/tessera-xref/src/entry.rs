//! Cross-reference entries and their flat wire form.

use tessera_codec::RawRecord;
use tessera_core::{FreeSlot, ObjectId, SlotIndex, TileCoord};

/// Wire position of each entry field.
pub(crate) const FIELD_TILE_X: usize = 0;
pub(crate) const FIELD_TILE_Y: usize = 1;
pub(crate) const FIELD_OWNER: usize = 2;
pub(crate) const FIELD_BUCKET_NEXT: usize = 3;
pub(crate) const FIELD_RING_NEXT: usize = 4;

/// A placed entry: one tile of one object's footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The object this entry belongs to.
    pub owner: ObjectId,
    /// The tile this entry is chained under.
    pub tile: TileCoord,
    /// Next entry on the same tile, [`SlotIndex::NONE`] at the end.
    pub bucket_next: SlotIndex,
    /// Next entry of the same placement; the ring closes on itself.
    pub ring_next: SlotIndex,
}

/// One slot of the cross-reference table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XrefEntry {
    /// On the free stack.
    Free {
        /// Next free entry, [`SlotIndex::NONE`] at the bottom.
        next_free: SlotIndex,
    },
    /// Chained under a tile and linked into a membership ring.
    Placed(Placement),
}

impl XrefEntry {
    /// Encoded size in bytes.
    pub const SIZE: usize = RawRecord::<5>::SIZE;

    /// The placement, if this entry is in use.
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            XrefEntry::Placed(p) => Some(p),
            XrefEntry::Free { .. } => None,
        }
    }

    /// The wire record. Free entries reuse `bucketNext` as the free link.
    pub fn to_raw(&self) -> RawRecord<5> {
        let mut fields = [0u16; 5];
        match *self {
            XrefEntry::Free { next_free } => {
                fields[FIELD_TILE_X] = TileCoord::FREE_AXIS;
                fields[FIELD_TILE_Y] = TileCoord::FREE_AXIS;
                fields[FIELD_BUCKET_NEXT] = next_free.0;
            }
            XrefEntry::Placed(p) => {
                fields[FIELD_TILE_X] = p.tile.x;
                fields[FIELD_TILE_Y] = p.tile.y;
                fields[FIELD_OWNER] = p.owner.0;
                fields[FIELD_BUCKET_NEXT] = p.bucket_next.0;
                fields[FIELD_RING_NEXT] = p.ring_next.0;
            }
        }
        RawRecord(fields)
    }

    /// Interpret a wire record as a free entry.
    pub fn free_from_raw(raw: &RawRecord<5>) -> Self {
        XrefEntry::Free {
            next_free: SlotIndex(raw.field(FIELD_BUCKET_NEXT)),
        }
    }

    /// Interpret a wire record as a placed entry.
    pub fn placed_from_raw(raw: &RawRecord<5>) -> Self {
        XrefEntry::Placed(Placement {
            owner: ObjectId(raw.field(FIELD_OWNER)),
            tile: TileCoord::new(raw.field(FIELD_TILE_X), raw.field(FIELD_TILE_Y)),
            bucket_next: SlotIndex(raw.field(FIELD_BUCKET_NEXT)),
            ring_next: SlotIndex(raw.field(FIELD_RING_NEXT)),
        })
    }

    /// Whether a record has exactly the canonical free layout.
    pub(crate) fn is_canonical_free(raw: &RawRecord<5>) -> bool {
        raw.field(FIELD_TILE_X) == TileCoord::FREE_AXIS
            && raw.field(FIELD_TILE_Y) == TileCoord::FREE_AXIS
            && raw.field(FIELD_OWNER) == 0
            && raw.field(FIELD_RING_NEXT) == 0
    }
}

impl FreeSlot for XrefEntry {
    fn vacant(next_free: SlotIndex) -> Self {
        XrefEntry::Free { next_free }
    }

    fn next_free(&self) -> Option<SlotIndex> {
        match self {
            XrefEntry::Free { next_free } => Some(*next_free),
            XrefEntry::Placed(_) => None,
        }
    }
}
