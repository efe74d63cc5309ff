//! Embedded free-list allocation over a [`FixedSlotTable`].
//!
//! [`FreeListAllocator`] keeps unused slots on a LIFO stack threaded
//! through the free slots themselves (each free slot names the next
//! one). The stack head lives in the allocator rather than in slot 0;
//! table encoders write it back into slot 0 for the save format.
//!
//! Initialization pushes slots so that the **lowest** index ends on top:
//! a fresh table hands out 1, 2, 3, ... in order. Save files depend on
//! this ordering for byte-exact re-serialization.

use std::num::NonZeroU16;

use tessera_codec::CodecError;
use tessera_core::{FreeSlot, SlotError, SlotIndex};

use crate::table::FixedSlotTable;

/// O(1) slot allocator with the free stack embedded in the slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeListAllocator<T> {
    table: FixedSlotTable<T>,
    /// Top of the free stack, [`SlotIndex::NONE`] when empty.
    free_head: SlotIndex,
    /// Number of slots on the free stack.
    free_len: usize,
}

impl<T: FreeSlot> FreeListAllocator<T> {
    /// Create an allocator of `capacity` slots, all free except the sentinel.
    pub fn new(capacity: usize) -> Result<Self, SlotError> {
        let table = FixedSlotTable::new(capacity, |i| T::vacant(initial_next(i, capacity)))?;
        Ok(Self {
            table,
            free_head: initial_head(capacity),
            free_len: capacity - 1,
        })
    }

    /// Like [`new`](Self::new) for a capacity that cannot be out of range.
    pub fn with_capacity(capacity: NonZeroU16) -> Self {
        let len = usize::from(capacity.get());
        Self {
            table: FixedSlotTable::with_len(capacity, |i| T::vacant(initial_next(i, len))),
            free_head: initial_head(len),
            free_len: len - 1,
        }
    }

    /// Rebuild an allocator from decoded slots and a stored free head.
    ///
    /// Walks the free stack to recount it. Fails if the stack leaves the
    /// table, revisits a slot, or passes through a slot in use.
    pub fn from_slots(slots: Vec<T>, free_head: SlotIndex) -> Result<Self, CodecError> {
        let capacity = slots.len();
        let table = FixedSlotTable::from_vec(slots)
            .map_err(|_| CodecError::CapacityOutOfRange { capacity })?;

        let mut seen = vec![false; capacity];
        let mut free_len = 0;
        let mut from = 0usize;
        let mut cursor = free_head;
        while cursor.is_some() {
            let i = cursor.as_usize();
            let slot = table.get(cursor).ok_or(CodecError::LinkOutOfRange {
                slot: from,
                link: cursor.0,
                capacity,
            })?;
            let next = match slot.next_free() {
                Some(next) if !seen[i] => next,
                _ => return Err(CodecError::BrokenFreeChain { slot: i }),
            };
            seen[i] = true;
            free_len += 1;
            from = i;
            cursor = next;
        }

        Ok(Self {
            table,
            free_head,
            free_len,
        })
    }

    /// Return every slot to the free stack in initial order.
    pub fn reset(&mut self) {
        let capacity = self.table.capacity();
        self.table
            .fill_with(|i| T::vacant(initial_next(i, capacity)));
        self.free_head = initial_head(capacity);
        self.free_len = capacity - 1;
    }

    /// Pop the free head and store `value` in it.
    ///
    /// Fails with [`SlotError::Exhausted`] when no slot is free.
    pub fn acquire(&mut self, value: T) -> Result<SlotIndex, SlotError> {
        let head = self.free_head;
        if head.is_none() {
            log::debug!(
                "free list exhausted (capacity {})",
                self.table.capacity()
            );
            return Err(SlotError::Exhausted {
                requested: 1,
                available: 0,
            });
        }
        let Some(slot) = self.table.get_mut(head) else {
            log::warn!("free head {head} is outside the table");
            return Err(SlotError::Exhausted {
                requested: 1,
                available: 0,
            });
        };
        let Some(next) = slot.next_free() else {
            log::warn!("free head {head} is already in use");
            return Err(SlotError::Exhausted {
                requested: 1,
                available: 0,
            });
        };
        *slot = value;
        self.free_head = next;
        self.free_len -= 1;
        Ok(head)
    }

    /// Reset slot `index` to its free value and push it on the free stack.
    ///
    /// `index` must be a slot previously returned by [`acquire`](Self::acquire)
    /// and not yet released. Releasing the sentinel, an out-of-range index
    /// or a slot that is already free is a caller bug: it trips a debug
    /// assertion and is otherwise ignored.
    pub fn release(&mut self, index: SlotIndex) {
        let head = self.free_head;
        match self.table.get_mut(index) {
            Some(slot) if index.is_some() && !slot.is_free() => {
                *slot = T::vacant(head);
                self.free_head = index;
                self.free_len += 1;
            }
            _ => {
                log::warn!("ignoring release of slot {index}: not in use");
                debug_assert!(false, "release of slot {index} which is not in use");
            }
        }
    }

    /// Total number of slots, sentinel included.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Number of slots on the free stack.
    pub fn free_len(&self) -> usize {
        self.free_len
    }

    /// Number of slots currently in use.
    pub fn live_len(&self) -> usize {
        self.table.capacity() - 1 - self.free_len
    }

    /// Top of the free stack.
    pub fn free_head(&self) -> SlotIndex {
        self.free_head
    }

    /// An in-use slot. `None` for the sentinel, free slots and bad indices.
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        if index.is_none() {
            return None;
        }
        self.table.get(index).filter(|slot| !slot.is_free())
    }

    /// Mutable access to an in-use slot.
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        if index.is_none() {
            return None;
        }
        self.table.get_mut(index).filter(|slot| !slot.is_free())
    }

    /// Any slot, free or not, sentinel included.
    pub fn slot(&self, index: SlotIndex) -> Option<&T> {
        self.table.get(index)
    }

    /// In-use slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &T)> + '_ {
        self.table
            .iter()
            .skip(1)
            .filter(|(_, slot)| !slot.is_free())
    }

    /// All slots in index order, sentinel included.
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &T)> + '_ {
        self.table.iter()
    }
}

fn initial_head(capacity: usize) -> SlotIndex {
    if capacity > 1 {
        SlotIndex(1)
    } else {
        SlotIndex::NONE
    }
}

fn initial_next(index: SlotIndex, capacity: usize) -> SlotIndex {
    let next = index.as_usize() + 1;
    if index.is_none() || next >= capacity {
        SlotIndex::NONE
    } else {
        SlotIndex(next as u16)
    }
}

/// Mark the slots reachable along a raw free stack.
///
/// Decoders call this on flat records, before building tagged slots, to
/// learn which records are free. `next(i)` returns the stored next-free
/// link of record `i`.
pub fn free_chain_mask(
    capacity: usize,
    head: SlotIndex,
    next: impl Fn(usize) -> u16,
) -> Result<Vec<bool>, CodecError> {
    let mut mask = vec![false; capacity];
    let mut from = 0usize;
    let mut cursor = head;
    while cursor.is_some() {
        let i = cursor.as_usize();
        if i >= capacity {
            return Err(CodecError::LinkOutOfRange {
                slot: from,
                link: cursor.0,
                capacity,
            });
        }
        if mask[i] {
            return Err(CodecError::BrokenFreeChain { slot: i });
        }
        mask[i] = true;
        from = i;
        cursor = SlotIndex(next(i));
    }
    Ok(mask)
}
