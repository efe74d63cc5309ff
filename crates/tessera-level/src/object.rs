//! Master object table records.

use tessera_codec::RawRecord;
use tessera_core::{ClassId, FreeSlot, SlotIndex};

/// A live object: its class, its link in the class chain and the handle
/// of its placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Class of the object.
    pub class: ClassId,
    /// Link in the class's [`ObjectChain`](tessera_slots::ObjectChain).
    pub link: SlotIndex,
    /// Placement handle in the cross-reference index, `NONE` when the
    /// object covers no tile.
    pub anchor: SlotIndex,
}

/// One slot of the master object table.
///
/// Wire form is `class, link, anchor`; free records are
/// `FFFF <nextFree> 0000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectSlot {
    /// On the free stack.
    Free {
        /// Next free record.
        next_free: SlotIndex,
    },
    /// A live object.
    Live(ObjectRecord),
}

impl ObjectSlot {
    /// Encoded size in bytes.
    pub const SIZE: usize = RawRecord::<3>::SIZE;

    /// Class value written into free records.
    pub const FREE_CLASS: u16 = 0xFFFF;

    /// The record, if live.
    pub fn record(&self) -> Option<&ObjectRecord> {
        match self {
            ObjectSlot::Live(r) => Some(r),
            ObjectSlot::Free { .. } => None,
        }
    }

    /// The wire record.
    pub fn to_raw(&self) -> RawRecord<3> {
        match *self {
            ObjectSlot::Free { next_free } => RawRecord([Self::FREE_CLASS, next_free.0, 0]),
            ObjectSlot::Live(r) => RawRecord([r.class.0, r.link.0, r.anchor.0]),
        }
    }

    /// Read a wire record known to be live.
    pub fn live_from_raw(raw: &RawRecord<3>) -> Self {
        ObjectSlot::Live(ObjectRecord {
            class: ClassId(raw.field(0)),
            link: SlotIndex(raw.field(1)),
            anchor: SlotIndex(raw.field(2)),
        })
    }
}

impl FreeSlot for ObjectSlot {
    fn vacant(next_free: SlotIndex) -> Self {
        ObjectSlot::Free { next_free }
    }

    fn next_free(&self) -> Option<SlotIndex> {
        match self {
            ObjectSlot::Free { next_free } => Some(*next_free),
            ObjectSlot::Live(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_record_layout() {
        assert_eq!(
            ObjectSlot::vacant(SlotIndex(9)).to_raw(),
            RawRecord([0xFFFF, 9, 0])
        );
    }

    #[test]
    fn live_record_layout() {
        let slot = ObjectSlot::Live(ObjectRecord {
            class: ClassId(3),
            link: SlotIndex(4),
            anchor: SlotIndex(12),
        });
        let raw = slot.to_raw();
        assert_eq!(raw, RawRecord([3, 4, 12]));
        assert_eq!(ObjectSlot::live_from_raw(&raw), slot);
    }
}
