//! Capability traits shared by slot tables and tile grids.

use crate::id::{SlotIndex, TileCoord};

/// Per-tile storage of a cross-reference bucket head.
///
/// The cross-reference index never sizes or allocates tiles; it only reads
/// and writes this one pointer per tile. Implemented by the level's tile
/// map and by test mocks.
pub trait TileGrid {
    /// Index of the first entry chained at `tile`, or [`SlotIndex::NONE`].
    fn bucket_head(&self, tile: TileCoord) -> SlotIndex;

    /// Replace the first entry chained at `tile`.
    fn set_bucket_head(&mut self, tile: TileCoord, head: SlotIndex);

    /// Whether `tile` is addressable in this grid.
    ///
    /// Placements are checked against this before any state changes.
    fn contains(&self, tile: TileCoord) -> bool {
        !tile.is_sentinel()
    }
}

/// A slot type that can sit on an embedded free stack.
///
/// A free slot stores only the index of the next free slot. The
/// allocator never inspects the payload of an in-use slot.
pub trait FreeSlot {
    /// The canonical free value pointing at `next_free`.
    fn vacant(next_free: SlotIndex) -> Self;

    /// `Some(next)` if this slot is free, `None` if it is in use.
    fn next_free(&self) -> Option<SlotIndex>;

    /// Whether this slot is on the free stack.
    fn is_free(&self) -> bool {
        self.next_free().is_some()
    }
}
