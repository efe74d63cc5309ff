//! Bucket-chain and membership-ring walkers.
//!
//! Both walkers are bounded by the table capacity and stop at the first
//! entry that is not placed, so a damaged table yields a short walk
//! instead of an endless one.

use tessera_core::SlotIndex;
use tessera_slots::FreeListAllocator;

use crate::entry::XrefEntry;

/// Entries chained under one tile, most recently placed first.
pub struct BucketIter<'a> {
    entries: &'a FreeListAllocator<XrefEntry>,
    cursor: SlotIndex,
    remaining: usize,
}

impl<'a> BucketIter<'a> {
    pub(crate) fn new(entries: &'a FreeListAllocator<XrefEntry>, head: SlotIndex) -> Self {
        Self {
            entries,
            cursor: head,
            remaining: entries.capacity(),
        }
    }
}

impl Iterator for BucketIter<'_> {
    type Item = SlotIndex;

    fn next(&mut self) -> Option<SlotIndex> {
        if self.cursor.is_none() || self.remaining == 0 {
            return None;
        }
        let current = self.cursor;
        let placement = self.entries.get(current)?.placement()?;
        self.remaining -= 1;
        self.cursor = placement.bucket_next;
        Some(current)
    }
}

/// Entries of one placement, starting at its handle.
pub struct RingIter<'a> {
    entries: &'a FreeListAllocator<XrefEntry>,
    start: SlotIndex,
    cursor: SlotIndex,
    remaining: usize,
}

impl<'a> RingIter<'a> {
    pub(crate) fn new(entries: &'a FreeListAllocator<XrefEntry>, handle: SlotIndex) -> Self {
        Self {
            entries,
            start: handle,
            cursor: handle,
            remaining: entries.capacity(),
        }
    }
}

impl Iterator for RingIter<'_> {
    type Item = SlotIndex;

    fn next(&mut self) -> Option<SlotIndex> {
        if self.cursor.is_none() || self.remaining == 0 {
            return None;
        }
        let current = self.cursor;
        let placement = self.entries.get(current)?.placement()?;
        self.remaining -= 1;
        self.cursor = if placement.ring_next == self.start {
            SlotIndex::NONE
        } else {
            placement.ring_next
        };
        Some(current)
    }
}
