//! Strongly-typed identifiers and the [`TileCoord`] type.

use std::fmt;

/// Largest table capacity addressable with a 16-bit [`SlotIndex`].
pub const MAX_CAPACITY: usize = u16::MAX as usize + 1;

/// Index of a slot within a fixed-capacity table.
///
/// Slot 0 is the sentinel of every table: it carries allocator and ring
/// bookkeeping on the wire and never holds payload. [`SlotIndex::NONE`]
/// doubles as "end of chain" and "no slot".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u16);

impl SlotIndex {
    /// The sentinel slot, also used as the null link.
    pub const NONE: SlotIndex = SlotIndex(0);

    /// Convert a `usize` position, returning `None` if it does not fit in 16 bits.
    pub fn from_usize(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(SlotIndex)
    }

    /// Whether this is the sentinel / null link.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether this refers to a real (non-sentinel) slot.
    pub fn is_some(self) -> bool {
        self.0 != 0
    }

    /// The index as a `usize` for array addressing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SlotIndex {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Identifies a live object within a level.
///
/// `ObjectId(0)` is reserved: a cross-reference entry whose owner is 0 is
/// free.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u16);

impl ObjectId {
    /// The reserved "no object" id.
    pub const NONE: ObjectId = ObjectId(0);

    /// Whether this is the reserved "no object" id.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ObjectId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Identifies an object class. Each class keeps its own live-object chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u16);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for ClassId {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// A map tile location.
///
/// Both axes are 16-bit. `0xFFFF` on either axis is the free-entry marker
/// written by the save format and is never a placeable tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl TileCoord {
    /// Coordinate value stored in free entries.
    pub const FREE_AXIS: u16 = 0xFFFF;

    /// The coordinate pair stored in free entries.
    pub const FREE: TileCoord = TileCoord {
        x: Self::FREE_AXIS,
        y: Self::FREE_AXIS,
    };

    /// Create a tile coordinate.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Whether either axis carries the free marker.
    pub fn is_sentinel(self) -> bool {
        self.x == Self::FREE_AXIS || self.y == Self::FREE_AXIS
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u16, u16)> for TileCoord {
    fn from((x, y): (u16, u16)) -> Self {
        Self { x, y }
    }
}
