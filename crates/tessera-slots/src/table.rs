//! Fixed-capacity indexed slot storage.

use std::num::NonZeroU16;

use tessera_core::{SlotError, SlotIndex, MAX_CAPACITY};

/// A fixed-capacity array of uniform slots addressed by [`SlotIndex`].
///
/// The backing storage is allocated once at construction and never
/// resized. Slot 0 exists in storage but is reserved as the sentinel;
/// owners decide what it means on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedSlotTable<T> {
    slots: Box<[T]>,
}

impl<T> FixedSlotTable<T> {
    /// Create a table of `capacity` slots, filling each with `init(index)`.
    pub fn new(capacity: usize, init: impl FnMut(SlotIndex) -> T) -> Result<Self, SlotError> {
        check_capacity(capacity)?;
        Ok(Self::build(capacity, init))
    }

    /// Create a table whose capacity is valid by construction.
    pub fn with_len(capacity: NonZeroU16, init: impl FnMut(SlotIndex) -> T) -> Self {
        Self::build(usize::from(capacity.get()), init)
    }

    fn build(capacity: usize, mut init: impl FnMut(SlotIndex) -> T) -> Self {
        let slots = (0..capacity)
            .map(|i| init(SlotIndex(i as u16)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { slots }
    }

    /// Wrap already-built slots (used by decoders).
    pub fn from_vec(slots: Vec<T>) -> Result<Self, SlotError> {
        check_capacity(slots.len())?;
        Ok(Self {
            slots: slots.into_boxed_slice(),
        })
    }

    /// Total number of slots, sentinel included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether `index` addresses a slot of this table.
    pub fn in_range(&self, index: SlotIndex) -> bool {
        index.as_usize() < self.slots.len()
    }

    /// Shared access to a slot.
    pub fn get(&self, index: SlotIndex) -> Option<&T> {
        self.slots.get(index.as_usize())
    }

    /// Mutable access to a slot.
    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut T> {
        self.slots.get_mut(index.as_usize())
    }

    /// Overwrite every slot with `init(index)`.
    pub fn fill_with(&mut self, mut init: impl FnMut(SlotIndex) -> T) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = init(SlotIndex(i as u16));
        }
    }

    /// Iterate over all slots in index order, sentinel included.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (SlotIndex(i as u16), slot))
    }
}

fn check_capacity(capacity: usize) -> Result<(), SlotError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(SlotError::InvalidCapacity { capacity });
    }
    Ok(())
}
