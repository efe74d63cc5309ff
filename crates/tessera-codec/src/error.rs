//! Error types for the table codec.

use std::fmt;
use std::io;

/// Errors that can occur while decoding or streaming a save table.
#[derive(Debug)]
pub enum CodecError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The buffer length is zero or not a multiple of the record size.
    LengthMismatch {
        /// Length of the buffer in bytes.
        len: usize,
        /// Size of one record in bytes.
        record_size: usize,
    },
    /// The table holds more records than a 16-bit index can address.
    CapacityOutOfRange {
        /// Number of records found.
        capacity: usize,
    },
    /// The table does not have the capacity the caller expects.
    CapacityMismatch {
        /// Capacity the caller configured.
        expected: usize,
        /// Capacity found in the buffer.
        found: usize,
    },
    /// A stored link points past the end of its table.
    LinkOutOfRange {
        /// Slot holding the bad link.
        slot: usize,
        /// The stored link value.
        link: u16,
        /// Capacity of the table.
        capacity: usize,
    },
    /// The embedded free stack loops back on itself or runs through a
    /// slot that is in use.
    BrokenFreeChain {
        /// First slot visited twice or found in use.
        slot: usize,
    },
    /// The live ring is not a single head-to-tail walk: a `previous`
    /// pointer disagrees, the cached tail is not the last link, a link is
    /// reached twice, or an in-use slot is never reached.
    BrokenRing {
        /// Slot where the walk disagreed with the table.
        slot: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::LengthMismatch { len, record_size } => {
                write!(
                    f,
                    "table length {len} is not a non-zero multiple of {record_size}"
                )
            }
            Self::CapacityOutOfRange { capacity } => {
                write!(f, "table capacity {capacity} exceeds 65536 records")
            }
            Self::CapacityMismatch { expected, found } => {
                write!(f, "table capacity mismatch: expected {expected}, found {found}")
            }
            Self::LinkOutOfRange {
                slot,
                link,
                capacity,
            } => {
                write!(
                    f,
                    "slot {slot} links to {link}, outside table of {capacity}"
                )
            }
            Self::BrokenFreeChain { slot } => {
                write!(f, "free chain is broken at slot {slot}")
            }
            Self::BrokenRing { slot } => write!(f, "live ring is broken at slot {slot}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
