//! Core types and traits for Tessera level tables.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Tessera workspace:
//! slot and object identifiers, tile coordinates, the shared error type,
//! and the capability traits that tables and tile grids implement.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::SlotError;
pub use id::{ClassId, ObjectId, SlotIndex, TileCoord, MAX_CAPACITY};
pub use traits::{FreeSlot, TileGrid};
