//! Tail-appended ring of live objects for one object class.
//!
//! [`ObjectChain`] keeps the currently-live links of a class table in
//! acquisition order as a circular doubly-linked list through the
//! sentinel: slot 0's `next` is the first live link, the last live link's
//! `next` is 0, and a cached tail makes appends O(1).
//!
//! On the wire each link is `payloadRef, next, previous` (three LE `u16`).
//! Free links store their next-free pointer in `previous`, and slot 0 is
//! written as `cachedTail, ringHead, freeHead`.

use std::io::Write;

use tessera_codec::{decode_table, encode_table, write_table, CodecError, RawRecord};
use tessera_core::{FreeSlot, SlotError, SlotIndex};

use crate::alloc::{free_chain_mask, FreeListAllocator};

/// One slot of a chain table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainSlot {
    /// On the free stack.
    Free {
        /// Next free slot, [`SlotIndex::NONE`] at the bottom.
        next_free: SlotIndex,
    },
    /// A member of the live ring.
    Linked {
        /// Caller-supplied reference, usually the owning object's id.
        payload: u16,
        /// Next live link, [`SlotIndex::NONE`] for the tail.
        next: SlotIndex,
        /// Previous live link, [`SlotIndex::NONE`] for the head.
        previous: SlotIndex,
    },
}

impl FreeSlot for ChainSlot {
    fn vacant(next_free: SlotIndex) -> Self {
        ChainSlot::Free { next_free }
    }

    fn next_free(&self) -> Option<SlotIndex> {
        match self {
            ChainSlot::Free { next_free } => Some(*next_free),
            ChainSlot::Linked { .. } => None,
        }
    }
}

/// Flat view of a chain slot as stored in the save table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainLink {
    /// Payload reference (cached tail for slot 0).
    pub payload_ref: u16,
    /// Next link (ring head for slot 0).
    pub next: SlotIndex,
    /// Previous link (free head for slot 0 and next-free for free slots).
    pub previous: SlotIndex,
}

impl ChainLink {
    /// Encoded size in bytes.
    pub const SIZE: usize = RawRecord::<3>::SIZE;

    /// The wire record.
    pub fn to_raw(self) -> RawRecord<3> {
        RawRecord([self.payload_ref, self.next.0, self.previous.0])
    }

    /// Read a wire record.
    pub fn from_raw(raw: RawRecord<3>) -> Self {
        Self {
            payload_ref: raw.field(0),
            next: SlotIndex(raw.field(1)),
            previous: SlotIndex(raw.field(2)),
        }
    }
}

/// Ordered set of live links over a fixed table, with O(1) append and removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectChain {
    slots: FreeListAllocator<ChainSlot>,
    /// First live link.
    head: SlotIndex,
    /// Last live link.
    tail: SlotIndex,
    /// Number of links in the ring.
    len: usize,
}

impl ObjectChain {
    /// Create a chain with `capacity` slots (`capacity - 1` usable links).
    pub fn new(capacity: usize) -> Result<Self, SlotError> {
        Ok(Self {
            slots: FreeListAllocator::new(capacity)?,
            head: SlotIndex::NONE,
            tail: SlotIndex::NONE,
            len: 0,
        })
    }

    /// Empty the ring and return every slot to the free stack.
    pub fn clear(&mut self) {
        self.slots.reset();
        self.head = SlotIndex::NONE;
        self.tail = SlotIndex::NONE;
        self.len = 0;
    }

    /// Acquire a free link and append it at the tail of the ring.
    pub fn acquire_link(&mut self) -> Result<SlotIndex, SlotError> {
        self.acquire_link_with(0)
    }

    /// Acquire a free link carrying `payload` and append it at the tail.
    pub fn acquire_link_with(&mut self, payload: u16) -> Result<SlotIndex, SlotError> {
        let tail = self.tail;
        let index = self.slots.acquire(ChainSlot::Linked {
            payload,
            next: SlotIndex::NONE,
            previous: tail,
        })?;
        if tail.is_none() {
            self.head = index;
        } else {
            self.set_next(tail, index);
        }
        self.tail = index;
        self.len += 1;
        Ok(index)
    }

    /// Unlink `index` from the ring and return it to the free stack.
    ///
    /// `index` must currently be in the ring. Anything else trips a debug
    /// assertion and is otherwise ignored.
    pub fn release_link(&mut self, index: SlotIndex) {
        let Some(&ChainSlot::Linked { next, previous, .. }) = self.slots.get(index) else {
            log::warn!("ignoring release of chain link {index}: not linked");
            debug_assert!(false, "release of chain link {index} which is not linked");
            return;
        };
        if previous.is_none() {
            self.head = next;
        } else {
            self.set_next(previous, next);
        }
        if next.is_some() {
            self.set_previous(next, previous);
        }
        if self.tail == index {
            self.tail = previous;
        }
        self.slots.release(index);
        self.len = self.len.saturating_sub(1);
    }

    /// Set the payload of a live link. Returns `false` if `index` is not live.
    pub fn set_payload(&mut self, index: SlotIndex, value: u16) -> bool {
        match self.slots.get_mut(index) {
            Some(ChainSlot::Linked { payload, .. }) => {
                *payload = value;
                true
            }
            _ => false,
        }
    }

    /// Payload of a live link.
    pub fn payload(&self, index: SlotIndex) -> Option<u16> {
        match self.slots.get(index) {
            Some(&ChainSlot::Linked { payload, .. }) => Some(payload),
            _ => None,
        }
    }

    /// Flat view of slot `index`; slot 0 is the sentinel record.
    pub fn link(&self, index: SlotIndex) -> Option<ChainLink> {
        if index.is_none() {
            return Some(ChainLink {
                payload_ref: self.tail.0,
                next: self.head,
                previous: self.slots.free_head(),
            });
        }
        let link = match *self.slots.slot(index)? {
            ChainSlot::Free { next_free } => ChainLink {
                payload_ref: 0,
                next: SlotIndex::NONE,
                previous: next_free,
            },
            ChainSlot::Linked {
                payload,
                next,
                previous,
            } => ChainLink {
                payload_ref: payload,
                next,
                previous,
            },
        };
        Some(link)
    }

    /// Walk the ring from the sentinel in acquisition order.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            cursor: self.head,
            remaining: self.slots.capacity(),
        }
    }

    /// Number of links in the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the ring is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First link in the ring.
    pub fn head(&self) -> SlotIndex {
        self.head
    }

    /// Cached tail of the ring.
    pub fn tail(&self) -> SlotIndex {
        self.tail
    }

    /// Total slots, sentinel included.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Free links remaining.
    pub fn free_len(&self) -> usize {
        self.slots.free_len()
    }

    /// Encode to exactly `capacity * 6` bytes.
    pub fn encode(&self) -> Vec<u8> {
        encode_table(self.raw_records())
    }

    /// Stream the encoded table to a writer.
    pub fn write_to(&self, w: &mut dyn Write) -> Result<(), CodecError> {
        write_table(w, self.raw_records())
    }

    /// Restore a chain from an encoded table. Capacity is `bytes.len() / 6`.
    pub fn decode_from(bytes: &[u8]) -> Result<Self, CodecError> {
        let records = decode_table::<3>(bytes)?;
        let capacity = records.len();
        for (slot, raw) in records.iter().enumerate().skip(1) {
            for link in [raw.field(1), raw.field(2)] {
                if link as usize >= capacity {
                    return Err(CodecError::LinkOutOfRange {
                        slot,
                        link,
                        capacity,
                    });
                }
            }
        }
        let sentinel = ChainLink::from_raw(records[0]);
        for link in [sentinel.payload_ref, sentinel.next.0, sentinel.previous.0] {
            if link as usize >= capacity {
                return Err(CodecError::LinkOutOfRange {
                    slot: 0,
                    link,
                    capacity,
                });
            }
        }

        let free = free_chain_mask(capacity, sentinel.previous, |i| records[i].field(2))?;
        check_ring(&records, &free, sentinel.next, SlotIndex(sentinel.payload_ref))?;
        let slots: Vec<ChainSlot> = records
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let link = ChainLink::from_raw(*raw);
                if i == 0 {
                    ChainSlot::vacant(SlotIndex::NONE)
                } else if free[i] {
                    if link.payload_ref != 0 || link.next.is_some() {
                        log::warn!("free chain link {i} carries stale fields; dropping them");
                    }
                    ChainSlot::Free {
                        next_free: link.previous,
                    }
                } else {
                    ChainSlot::Linked {
                        payload: link.payload_ref,
                        next: link.next,
                        previous: link.previous,
                    }
                }
            })
            .collect();

        let mut chain = Self {
            slots: FreeListAllocator::from_slots(slots, sentinel.previous)?,
            head: sentinel.next,
            tail: SlotIndex(sentinel.payload_ref),
            len: 0,
        };
        chain.len = chain.iter().count();
        Ok(chain)
    }

    fn raw_records(&self) -> impl Iterator<Item = RawRecord<3>> + '_ {
        self.slots.slots().map(|(i, _)| {
            self.link(i)
                .map(ChainLink::to_raw)
                .unwrap_or(RawRecord([0; 3]))
        })
    }

    fn set_next(&mut self, at: SlotIndex, to: SlotIndex) {
        if let Some(ChainSlot::Linked { next, .. }) = self.slots.get_mut(at) {
            *next = to;
        }
    }

    fn set_previous(&mut self, at: SlotIndex, to: SlotIndex) {
        if let Some(ChainSlot::Linked { previous, .. }) = self.slots.get_mut(at) {
            *previous = to;
        }
    }
}

/// Walk the stored ring from `head` and check that it is the only live
/// structure in the table: `previous` mirrors `next` at every step, the
/// walk ends at the cached `tail`, and every slot off the free stack is
/// reached exactly once.
fn check_ring(
    records: &[RawRecord<3>],
    free: &[bool],
    head: SlotIndex,
    tail: SlotIndex,
) -> Result<(), CodecError> {
    let mut reached = vec![false; records.len()];
    let mut previous = SlotIndex::NONE;
    let mut cursor = head;
    while cursor.is_some() {
        let i = cursor.as_usize();
        if free[i] || reached[i] || records[i].field(2) != previous.0 {
            return Err(CodecError::BrokenRing { slot: i });
        }
        reached[i] = true;
        previous = cursor;
        cursor = SlotIndex(records[i].field(1));
    }
    if previous != tail {
        return Err(CodecError::BrokenRing { slot: 0 });
    }
    match (1..records.len()).find(|&i| !free[i] && !reached[i]) {
        Some(slot) => Err(CodecError::BrokenRing { slot }),
        None => Ok(()),
    }
}

/// Iterator over an [`ObjectChain`]'s live links, head to tail.
///
/// Bounded by the table capacity so a corrupted ring cannot loop forever.
pub struct ChainIter<'a> {
    chain: &'a ObjectChain,
    cursor: SlotIndex,
    remaining: usize,
}

impl Iterator for ChainIter<'_> {
    type Item = SlotIndex;

    fn next(&mut self) -> Option<SlotIndex> {
        if self.cursor.is_none() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.cursor;
        self.cursor = match self.chain.slots.get(current) {
            Some(&ChainSlot::Linked { next, .. }) => next,
            _ => return None,
        };
        Some(current)
    }
}
