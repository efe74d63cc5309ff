//! Error types for slot allocation and placement.

use std::error::Error;
use std::fmt;

use crate::id::TileCoord;

/// Errors from fixed-slot tables and the operations built on them.
///
/// [`SlotError::Exhausted`] is the only failure of a well-formed
/// acquire or placement call. It is never fatal: the table is left
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotError {
    /// The free pool has fewer slots than the call needs.
    Exhausted {
        /// Number of slots the call asked for.
        requested: usize,
        /// Number of free slots at the time of the call.
        available: usize,
    },
    /// A table was constructed with a capacity outside `1..=65536`.
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
    /// A placement named a tile the grid does not contain.
    TileOutOfBounds {
        /// The offending tile.
        tile: TileCoord,
    },
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                requested,
                available,
            } => {
                write!(
                    f,
                    "slot pool exhausted: requested {requested}, available {available}"
                )
            }
            Self::InvalidCapacity { capacity } => {
                write!(f, "table capacity {capacity} is outside 1..=65536")
            }
            Self::TileOutOfBounds { tile } => {
                write!(f, "tile {tile} is outside the grid")
            }
        }
    }
}

impl Error for SlotError {}
